//! One-shot messages. A handler queues messages and redirects; the queue
//! rides along in a signed cookie and is drained by the next rendered page.

use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::AppError;

pub const FLASH_COOKIE: &str = "hr_flash";

// Undelivered messages are dropped after this many seconds.
const FLASH_TTL: usize = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FlashMessage {
    pub level: Level,
    #[schema(example = "Leave approved successfully.")]
    pub text: String,
}

#[derive(Serialize, Deserialize)]
struct FlashClaims {
    messages: Vec<FlashMessage>,
    exp: usize,
}

/// The message queue attached to the current request.
pub struct Flash {
    messages: Vec<FlashMessage>,
    secret: String,
    had_cookie: bool,
}

impl Flash {
    pub fn new(secret: &str) -> Self {
        Self {
            messages: Vec::new(),
            secret: secret.to_string(),
            had_cookie: false,
        }
    }

    fn from_request_cookie(req: &HttpRequest, secret: &str) -> Self {
        let mut flash = Self::new(secret);
        let Some(cookie) = req.cookie(FLASH_COOKIE) else {
            return flash;
        };

        flash.had_cookie = true;
        match decode::<FlashClaims>(
            cookie.value(),
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(data) => flash.messages = data.claims.messages,
            Err(e) => tracing::debug!(error = %e, "Discarding unreadable flash cookie"),
        }
        flash
    }

    pub fn push(&mut self, level: Level, text: impl Into<String>) {
        self.messages.push(FlashMessage {
            level,
            text: text.into(),
        });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Level::Success, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Level::Info, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(Level::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Level::Error, text);
    }

    /// `303 See Other` to `location`, carrying every undrained message.
    pub fn redirect(self, location: &str) -> HttpResponse {
        let mut resp = HttpResponse::SeeOther();
        resp.insert_header((header::LOCATION, location));

        if !self.messages.is_empty() {
            match self.to_cookie() {
                Ok(cookie) => {
                    resp.cookie(cookie);
                }
                Err(e) => tracing::error!(error = %e, "Failed to sign flash messages"),
            }
        }

        resp.finish()
    }

    /// Takes the queue for rendering. The returned cookie, when present,
    /// must be attached to the response so the browser forgets the queue.
    pub fn drain(self) -> (Vec<FlashMessage>, Option<Cookie<'static>>) {
        let removal = self.had_cookie.then(|| {
            let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
            cookie.make_removal();
            cookie
        });
        (self.messages, removal)
    }

    fn to_cookie(&self) -> Result<Cookie<'static>, jsonwebtoken::errors::Error> {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as usize)
            .unwrap_or_default()
            + FLASH_TTL;

        let token = encode(
            &Header::default(),
            &FlashClaims {
                messages: self.messages.clone(),
                exp,
            },
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(Cookie::build(FLASH_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish())
    }
}

impl FromRequest for Flash {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let flash = match req.app_data::<Data<Config>>() {
            Some(config) => Ok(Flash::from_request_cookie(req, &config.session_secret)),
            None => Err(AppError::Internal("App config missing".to_string())),
        };
        ready(flash)
    }
}
