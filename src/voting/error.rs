use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;

/// Reasons a vote or menu operation is refused.
#[derive(Debug)]
pub enum VotingError {
    /// The referenced restaurant does not exist (or none was given).
    UnknownRestaurant,
    /// Protocol version 1 requires an explicit day.
    MissingDay,
    /// The `api-version` header held something other than "1" or "2".
    UnsupportedVersion(String),
    /// The restaurant publishes no menu for the target day.
    NoMenuForDay,
    /// The user already voted for a menu on the target day.
    AlreadyVoted,
    /// The restaurant already has a menu for that day.
    DuplicateMenu,
    /// Constraint or connectivity failure in the store.
    Store(DbErr),
}

impl std::fmt::Display for VotingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingError::UnknownRestaurant => write!(f, "Restaurant does not exist."),
            VotingError::MissingDay => write!(f, "The day of week must be specified."),
            VotingError::UnsupportedVersion(v) => write!(f, "Unsupported API version: {:?}.", v),
            VotingError::NoMenuForDay => {
                write!(f, "This restaurant has no menu for the specified day.")
            }
            VotingError::AlreadyVoted => write!(f, "You have already voted for this day."),
            VotingError::DuplicateMenu => {
                write!(f, "A menu for this restaurant on this day already exists.")
            }
            VotingError::Store(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl std::error::Error for VotingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VotingError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DbErr> for VotingError {
    fn from(e: DbErr) -> Self {
        VotingError::Store(e)
    }
}

impl ResponseError for VotingError {
    fn status_code(&self) -> StatusCode {
        match self {
            VotingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            VotingError::Store(e) => {
                log::error!("Store error while handling vote/menu request: {}", e);
                "An unexpected error occurred.".to_owned()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}
