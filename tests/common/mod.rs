// Shared setup for the integration tests: an in-memory store with the
// migrations applied, the full route table, and helpers to act as a user.

#![allow(dead_code)]

use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::web::Data;
use actix_web::{App, Error, test};
use serde_json::Value;
use sqlx::SqlitePool;

use hr_portal::auth::password::hash_password;
use hr_portal::auth::session::{SESSION_COOKIE, encode_session};
use hr_portal::config::Config;
use hr_portal::db::init_db;
use hr_portal::model::role::Role;
use hr_portal::model::user::{NewUser, User};
use hr_portal::routes;
use hr_portal::utils::flash::FLASH_COOKIE;

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "s3cret-pass";

pub struct TestContext {
    pub pool: SqlitePool,
    pub config: Config,
}

impl TestContext {
    pub async fn new() -> Self {
        let config = Config::in_memory(SECRET);
        let pool = init_db(&config.database_url, config.database_max_connections)
            .await
            .expect("Failed to create test database");
        Self { pool, config }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<BoxBody>,
            Error = Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(Data::new(self.pool.clone()))
            .app_data(Data::new(self.config.clone()))
            .configure(routes::configure)
    }

    /// Stores an account whose password is `PASSWORD`.
    pub async fn seed_user(&self, username: &str, role: Role) -> i64 {
        let user = NewUser {
            username: username.to_string(),
            email: Some(format!("{username}@company.com")),
            password_hash: hash_password(PASSWORD).expect("hash"),
            role,
            department_id: None,
            employee_code: None,
        };
        User::insert(&self.pool, &user).await.expect("seed user")
    }

    /// A valid session cookie for `user_id` without going through /login.
    pub fn session(&self, user_id: i64, role: Role) -> Cookie<'static> {
        let token = encode_session(user_id, role, SECRET, self.config.session_ttl).expect("token");
        Cookie::new(SESSION_COOKIE, token)
    }
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

pub fn flash<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    cookie(resp, FLASH_COOKIE).expect("flash cookie on redirect")
}

/// Texts of the one-shot messages on a rendered page.
pub fn messages(page: &Value) -> Vec<String> {
    page["messages"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|m| m["text"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub async fn body_json(resp: ServiceResponse<BoxBody>) -> Value {
    test::read_body_json(resp).await
}
