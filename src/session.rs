//! Password hashing and cookie sessions.

use crate::orm::users;
use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use once_cell::sync::Lazy;
use sea_orm::{entity::*, DatabaseConnection};

/// Session key holding the logged-in user's id.
pub const SESSION_USER_KEY: &str = "user_id";

static ARGON2: Lazy<Argon2<'static>> = Lazy::new(Argon2::default);

pub fn get_argon2() -> &'static Argon2<'static> {
    &ARGON2
}

/// Hashes a password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(get_argon2()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Checks a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => get_argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Builds the cookie session middleware.
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
    ttl_hours: u32,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_same_site(SameSite::Lax)
        .cookie_secure(cookie_secure)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(ttl_hours as i64)),
        )
        .build()
}

/// Marks the session as belonging to `user_id`.
pub fn login(session: &Session, user_id: i32) -> Result<(), actix_web::Error> {
    session.renew();
    session
        .insert(SESSION_USER_KEY, user_id)
        .map_err(actix_web::error::ErrorInternalServerError)
}

pub fn logout(session: &Session) {
    session.purge();
}

/// Resolves the user behind a session, if any.
///
/// A session pointing at a deleted user counts as logged out.
pub async fn authenticate_client_by_session(
    session: &Session,
    db: &DatabaseConnection,
) -> Option<users::Model> {
    let user_id = match session.get::<i32>(SESSION_USER_KEY) {
        Ok(Some(id)) => id,
        Ok(None) => return None,
        Err(e) => {
            log::debug!("Unreadable session state: {}", e);
            return None;
        }
    };

    match users::Entity::find_by_id(user_id).one(db).await {
        Ok(user) => user,
        Err(e) => {
            log::error!("Failed to load session user {}: {}", user_id, e);
            None
        }
    }
}
