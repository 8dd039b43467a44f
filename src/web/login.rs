use super::error::{internal, json_error};
use crate::middleware::ClientCtx;
use crate::orm::users;
use crate::session::{self, verify_password};
use actix_web::http::StatusCode;
use actix_web::{post, web, Error, HttpResponse, Responder};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(post_login);
}

#[derive(Deserialize)]
pub struct FormData {
    username: String,
    password: String,
}

#[derive(Debug)]
pub enum LoginResultStatus {
    Success,
    BadName,
    BadPassword,
}

pub struct LoginResult {
    result: LoginResultStatus,
    user: Option<users::Model>,
}

impl LoginResult {
    fn success(user: users::Model) -> Self {
        Self {
            result: LoginResultStatus::Success,
            user: Some(user),
        }
    }
    fn fail(result: LoginResultStatus) -> Self {
        Self { result, user: None }
    }
}

pub async fn login(db: &DatabaseConnection, name: &str, pass: &str) -> Result<LoginResult, DbErr> {
    let user = users::Entity::find()
        .filter(users::Column::Username.eq(name))
        .one(db)
        .await?;

    let user = match user {
        Some(user) => user,
        None => return Ok(LoginResult::fail(LoginResultStatus::BadName)),
    };

    if !verify_password(pass, &user.password) {
        return Ok(LoginResult::fail(LoginResultStatus::BadPassword));
    }

    Ok(LoginResult::success(user))
}

#[post("/auth/login")]
pub async fn post_login(
    client: ClientCtx,
    cookies: actix_session::Session,
    db: web::Data<DatabaseConnection>,
    form: web::Json<FormData>,
) -> Result<impl Responder, Error> {
    if let Some(user) = client.get_user() {
        log::debug!("post_login: user {} is already logged in", user.id);
    }

    let result = login(db.get_ref(), form.username.trim(), &form.password)
        .await
        .map_err(internal)?;

    match (result.result, result.user) {
        (LoginResultStatus::Success, Some(user)) => {
            session::login(&cookies, user.id)?;
            log::info!("User logged in: {} (user_id: {})", user.username, user.id);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "id": user.id,
                "username": user.username,
            })))
        }
        (status, _) => {
            log::warn!(
                "Failed login for username {:?}: {:?}",
                form.username.trim(),
                status
            );
            Err(json_error(
                StatusCode::UNAUTHORIZED,
                "Invalid username or password.",
            ))
        }
    }
}
