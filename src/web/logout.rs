use crate::middleware::ClientCtx;
use crate::session;
use actix_web::{post, Error, HttpResponse, Responder};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(post_logout);
}

#[post("/auth/logout")]
pub async fn post_logout(
    client: ClientCtx,
    cookies: actix_session::Session,
) -> Result<impl Responder, Error> {
    match client.get_id() {
        Some(user_id) => log::info!("User logged out: user_id={}", user_id),
        None => log::debug!("post_logout: no user in session (already logged out?)"),
    }
    session::logout(&cookies);

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out." })))
}
