use std::marker::PhantomData;
use std::ops::Deref;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures::future::{FutureExt, LocalBoxFuture};
use sqlx::SqlitePool;

use crate::auth::gate::Capability;
use crate::auth::session::{SESSION_COOKIE, decode_session};
use crate::config::Config;
use crate::error::AppError;
use crate::model::role::Role;
use crate::model::user::User;

/// The request-scoped identity taken from the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
    pub role: Role,
}

impl SessionUser {
    pub fn from_cookie(req: &HttpRequest) -> Option<Self> {
        let cookie = req.cookie(SESSION_COOKIE)?;
        let config = req.app_data::<Data<Config>>()?;

        match decode_session(cookie.value(), &config.session_secret) {
            Ok(claims) => Some(SessionUser {
                user_id: claims.user_id,
                role: claims.role,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session cookie");
                None
            }
        }
    }
}

/// A session whose role is allowed capability `C` and whose account still
/// exists with that role. Extraction fails with `AppError::Unauthorized`
/// (redirect to login) before the handler body runs.
pub struct Authorized<C: Capability> {
    pub user: SessionUser,
    pub account: User,
    _capability: PhantomData<C>,
}

impl<C: Capability> Authorized<C> {
    /// Role check on the cookie alone, before touching the store.
    pub fn check(user: Option<SessionUser>) -> Result<SessionUser, AppError> {
        match user {
            Some(user) if C::permits(user.role) => Ok(user),
            Some(user) => {
                tracing::info!(
                    user_id = user.user_id,
                    role = %user.role,
                    capability = C::NAME,
                    "Role not permitted"
                );
                Err(AppError::Unauthorized)
            }
            None => Err(AppError::Unauthorized),
        }
    }

    /// Binds the session to its stored account. A deleted account, or one
    /// whose role changed since login, counts as no session at all.
    pub fn bind(user: SessionUser, account: Option<User>) -> Result<Self, AppError> {
        match account {
            Some(account) if account.role == user.role => Ok(Authorized {
                user,
                account,
                _capability: PhantomData,
            }),
            Some(account) => {
                tracing::info!(
                    user_id = user.user_id,
                    session_role = %user.role,
                    stored_role = %account.role,
                    "Session role no longer matches the account"
                );
                Err(AppError::Unauthorized)
            }
            None => {
                tracing::info!(user_id = user.user_id, "Session refers to a deleted account");
                Err(AppError::Unauthorized)
            }
        }
    }
}

impl<C: Capability> Deref for Authorized<C> {
    type Target = SessionUser;

    fn deref(&self) -> &SessionUser {
        &self.user
    }
}

impl<C: Capability> FromRequest for Authorized<C> {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = Self::check(SessionUser::from_cookie(req));
        let pool = req.app_data::<Data<SqlitePool>>().cloned();

        async move {
            let user = user?;
            let pool = pool.ok_or_else(|| AppError::Internal("database pool not configured".into()))?;
            let account = User::find(pool.get_ref(), user.user_id).await?;
            Self::bind(user, account)
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::gate::{ApplyLeave, ReviewLeaves};

    #[test]
    fn missing_session_is_unauthorized() {
        assert!(matches!(
            Authorized::<ReviewLeaves>::check(None),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn wrong_role_is_unauthorized() {
        let hr = SessionUser {
            user_id: 1,
            role: Role::Hr,
        };
        assert!(Authorized::<ApplyLeave>::check(Some(hr)).is_err());
    }

    #[test]
    fn permitted_role_passes_through() {
        let admin = SessionUser {
            user_id: 9,
            role: Role::Admin,
        };
        let user = Authorized::<ReviewLeaves>::check(Some(admin)).unwrap();
        assert_eq!(user.user_id, 9);
    }

    fn account(id: i64, role: Role) -> User {
        User {
            id,
            username: "hannah".into(),
            email: None,
            password: "hash".into(),
            role,
            department_id: None,
            employee_code: None,
        }
    }

    #[test]
    fn deleted_account_is_unauthorized() {
        let hr = SessionUser {
            user_id: 3,
            role: Role::Hr,
        };
        assert!(matches!(
            Authorized::<ReviewLeaves>::bind(hr, None),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn role_changed_since_login_is_unauthorized() {
        let hr = SessionUser {
            user_id: 3,
            role: Role::Hr,
        };
        assert!(Authorized::<ReviewLeaves>::bind(hr, Some(account(3, Role::Employee))).is_err());

        let auth = Authorized::<ReviewLeaves>::bind(hr, Some(account(3, Role::Hr))).unwrap();
        assert_eq!(auth.account.username, "hannah");
    }
}
