use crate::orm::users;
use crate::session::hash_password;
use crate::web::error::{bad_request, internal};
use actix_web::{post, web, Error, HttpResponse};
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct FormData {
    #[validate(length(min = 1, max = 150))]
    username: String,
    /// Optional; blank counts as absent.
    #[serde(default)]
    email: Option<String>,
    #[validate(length(min = 8, max = 1000))]
    password: String,
}

async fn insert_new_user(
    db: &DatabaseConnection,
    name: &str,
    pass: &str,
    email: Option<String>,
) -> Result<users::Model, DbErr> {
    users::ActiveModel {
        username: Set(name.to_owned()),
        email: Set(email),
        password: Set(pass.to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default() // all other attributes are `Unset`
    }
    .insert(db)
    .await
}

#[post("/users/register")]
pub async fn create_user_post(
    db: web::Data<DatabaseConnection>,
    form: web::Json<FormData>,
) -> Result<HttpResponse, Error> {
    form.validate().map_err(|e| {
        log::debug!("User registration validation failed: {}", e);
        bad_request(format!("Invalid registration data: {}", e))
    })?;

    // Sanitize inputs
    let username = form.username.trim();
    let email = form
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase);
    if let Some(email) = &email {
        if !validator::validate_email(email.as_str()) {
            return Err(bad_request("Invalid registration data: email is not valid."));
        }
    }

    let taken = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db.get_ref())
        .await
        .map_err(internal)?;
    if taken.is_some() {
        return Err(bad_request("A user with that username already exists."));
    }

    let password_hash = hash_password(&form.password).map_err(|e| {
        log::error!("Failed to hash password: {}", e);
        internal("Failed to create user")
    })?;

    let user = insert_new_user(db.get_ref(), username, &password_hash, email)
        .await
        .map_err(|e| {
            if crate::db::is_unique_violation(&e) {
                bad_request("A user with that username already exists.")
            } else {
                internal(e)
            }
        })?;

    log::info!("New user registered: {} (user_id: {})", username, user.id);

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User registered successfully"
    })))
}
