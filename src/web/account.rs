use crate::middleware::ClientCtx;
use actix_web::{get, Error, HttpResponse, Responder};
use serde::Serialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_account);
}

#[derive(Serialize)]
pub struct AccountView<'a> {
    pub id: i32,
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub created_at: chrono::NaiveDateTime,
}

/// Profile of the logged-in user.
#[get("/users/me")]
pub async fn view_account(client: ClientCtx) -> Result<impl Responder, Error> {
    let user = client.require_user()?;

    Ok(HttpResponse::Ok().json(AccountView {
        id: user.id,
        username: &user.username,
        email: user.email.as_deref(),
        created_at: user.created_at,
    }))
}
