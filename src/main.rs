use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use sqlx::SqlitePool;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hr_portal::auth::password::hash_password;
use hr_portal::config::{BootstrapAdmin, Config};
use hr_portal::db::init_db;
use hr_portal::docs::ApiDoc;
use hr_portal::model::role::Role;
use hr_portal::model::user::{NewUser, User};
use hr_portal::routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_db(&config.database_url, config.database_max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    if let Some(admin) = &config.bootstrap_admin {
        bootstrap_admin(&pool, admin).await?;
    }

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                // wildcard {_:.*} matches the UI's JS/CSS assets
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .configure(routes::configure)
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}

/// Creates the first admin so someone can log in to a fresh database.
async fn bootstrap_admin(pool: &SqlitePool, admin: &BootstrapAdmin) -> anyhow::Result<()> {
    if User::admin_exists(pool).await? {
        return Ok(());
    }

    let user = NewUser {
        username: admin.username.clone(),
        email: None,
        password_hash: hash_password(&admin.password)?,
        role: Role::Admin,
        department_id: None,
        employee_code: None,
    };

    match User::insert(pool, &user).await {
        Ok(user_id) => info!(user_id, username = %user.username, "Bootstrap admin created"),
        Err(e) => {
            warn!(error = %e, username = %user.username, "Could not create bootstrap admin");
            return Err(e.into());
        }
    }

    Ok(())
}
