//! Vote endpoints

use super::error::not_found;
use super::menus::MenuView;
use crate::day::SharedClock;
use crate::middleware::ClientCtx;
use crate::voting::{self, CastVote, VoteRequest, DEFAULT_API_VERSION};
use actix_web::{delete, get, post, web, Error, HttpRequest, HttpResponse, Responder};
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// Header selecting the vote request shape.
pub const API_VERSION_HEADER: &str = "api-version";

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // `delete_all` must be registered ahead of `/votes/{vote_id}`.
    conf.service(delete_all_votes)
        .service(create_vote)
        .service(list_votes)
        .service(view_vote)
        .service(delete_vote);
}

#[derive(Serialize)]
pub struct VoteView {
    pub id: i32,
    pub user: i32,
    pub menu: MenuView,
    pub created_at: chrono::NaiveDateTime,
}

impl From<CastVote> for VoteView {
    fn from(cast: CastVote) -> Self {
        Self {
            id: cast.vote.id,
            user: cast.vote.user_id,
            menu: MenuView::from(cast.menu),
            created_at: cast.vote.created_at,
        }
    }
}

/// Reads the `api-version` header, defaulting when absent.
///
/// A header that is not valid text is passed through as an empty string so
/// the engine rejects it as an unsupported version.
fn api_version(req: &HttpRequest) -> String {
    match req.headers().get(API_VERSION_HEADER) {
        Some(value) => value.to_str().unwrap_or_default().to_owned(),
        None => DEFAULT_API_VERSION.to_owned(),
    }
}

#[post("/votes")]
pub async fn create_vote(
    client: ClientCtx,
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    clock: web::Data<SharedClock>,
    body: web::Json<VoteRequest>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let version = api_version(&req);

    let cast = voting::cast_vote(db.get_ref(), clock.get_ref().as_ref(), user_id, &body, &version)
        .await
        .map_err(|e| {
            log::debug!(
                "Vote rejected: user_id={} api_version={:?} reason={}",
                user_id,
                version,
                e
            );
            e
        })?;

    Ok(HttpResponse::Created().json(VoteView::from(cast)))
}

/// Results for today's menus.
#[get("/votes")]
pub async fn list_votes(
    client: ClientCtx,
    db: web::Data<DatabaseConnection>,
    clock: web::Data<SharedClock>,
) -> Result<impl Responder, Error> {
    client.require_login()?;

    let results = voting::tally(db.get_ref(), clock.today())
        .await
        .map_err(voting::VotingError::from)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "results": results })))
}

/// Administrative reset of every vote on every day.
#[delete("/votes/delete_all")]
pub async fn delete_all_votes(
    client: ClientCtx,
    db: web::Data<DatabaseConnection>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;

    let deleted = voting::delete_all(db.get_ref())
        .await
        .map_err(voting::VotingError::from)?;
    log::info!("Votes reset by user_id={}", user_id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Deleted {} votes.", deleted)
    })))
}

#[get("/votes/{vote_id}")]
pub async fn view_vote(
    client: ClientCtx,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<impl Responder, Error> {
    client.require_login()?;

    let cast = voting::get_vote(db.get_ref(), path.into_inner())
        .await
        .map_err(voting::VotingError::from)?
        .ok_or_else(|| not_found("Vote not found."))?;

    Ok(HttpResponse::Ok().json(VoteView::from(cast)))
}

/// Removes one vote, letting its user vote again that day.
#[delete("/votes/{vote_id}")]
pub async fn delete_vote(
    client: ClientCtx,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let vote_id = path.into_inner();

    let deleted = voting::delete_vote(db.get_ref(), vote_id)
        .await
        .map_err(voting::VotingError::from)?;
    if !deleted {
        return Err(not_found("Vote not found."));
    }

    log::info!("Vote deleted: vote_id={} by user_id={}", vote_id, user_id);
    Ok(HttpResponse::NoContent().finish())
}
