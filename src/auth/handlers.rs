use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, error, info, instrument};

use crate::auth::password::verify_password;
use crate::auth::session::{cleared_session_cookie, encode_session, session_cookie};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::forms::login::LoginForm;
use crate::model::user::User;
use crate::utils::flash::Flash;
use crate::utils::page::{render, render_with_status};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Entry point; everything unauthenticated lands on the login page.
pub async fn index() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .finish()
}

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form", body = Object, example = json!({
            "page": "login",
            "messages": []
        }))
    ),
    tag = "Auth"
)]
pub async fn login_form(flash: Flash) -> HttpResponse {
    render(flash, "login", json!({}))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(
        content = LoginForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Logged in; redirected to the role's home page"),
        (status = 401, description = "Unknown username/password pair", body = Object, example = json!({
            "page": "login",
            "messages": [],
            "error": "Invalid credentials"
        }))
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, flash, form),
    fields(username = form.username.as_deref().unwrap_or_default())
)]
pub async fn login(
    form: web::Form<LoginForm>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    info!("Login request received");

    let Some((username, password)) = form.credentials() else {
        info!("Validation failed: empty username or password");
        return Ok(invalid_credentials(flash));
    };

    let user = match User::find_by_username(pool.get_ref(), username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return Ok(invalid_credentials(flash));
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return Err(e.into());
        }
    };

    debug!(user_id = user.id, "Verifying password");
    if !verify_password(password, &user.password) {
        info!("Invalid credentials: password mismatch");
        return Ok(invalid_credentials(flash));
    }

    let token = encode_session(user.id, user.role, &config.session_secret, config.session_ttl)?;

    info!(user_id = user.id, role = %user.role, "Login successful");

    let mut resp = flash.redirect(user.role.home_path());
    resp.add_cookie(&session_cookie(token, config.session_ttl))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(resp)
}

fn invalid_credentials(flash: Flash) -> HttpResponse {
    render_with_status(
        StatusCode::UNAUTHORIZED,
        flash,
        "login",
        json!({ "error": INVALID_CREDENTIALS }),
    )
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 303, description = "Session cleared; redirected to the login page")
    ),
    tag = "Auth"
)]
pub async fn logout() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .cookie(cleared_session_cookie())
        .finish()
}
