use crate::orm::users;
use crate::session::authenticate_client_by_session;
use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{error, web::Data, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sea_orm::DatabaseConnection;

/// Client context passed to routes.
/// Resolved from the session cookie at the start of the request.
#[derive(Clone, Debug, Default)]
pub struct ClientCtx {
    /// User data. Optional. None is a guest.
    client: Option<users::Model>,
}

impl ClientCtx {
    pub fn new(client: Option<users::Model>) -> Self {
        Self { client }
    }

    /// Returns either the user's id or None.
    pub fn get_id(&self) -> Option<i32> {
        self.client.as_ref().map(|u| u.id)
    }

    pub fn get_user(&self) -> Option<&users::Model> {
        self.client.as_ref()
    }

    /// Returns the user, or 401 for guests.
    pub fn require_user(&self) -> Result<&users::Model, Error> {
        self.client.as_ref().ok_or_else(|| {
            crate::web::error::json_error(
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided.",
            )
        })
    }

    /// Returns the user's id, or 401 for guests.
    pub fn require_login(&self) -> Result<i32, Error> {
        self.require_user().map(|u| u.id)
    }
}

impl FromRequest for ClientCtx {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = req.get_session();
        let db = req.app_data::<Data<DatabaseConnection>>().cloned();

        Box::pin(async move {
            let db = db.ok_or_else(|| {
                log::error!("DatabaseConnection missing from app data");
                error::ErrorInternalServerError("Database unavailable.")
            })?;
            let client = authenticate_client_by_session(&session, db.get_ref()).await;
            Ok(ClientCtx::new(client))
        })
    }
}
