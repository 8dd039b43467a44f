//! Daily lunch voting: menu resolution, vote eligibility and tallies.

pub mod eligibility;
pub mod error;
pub mod menus;
pub mod tally;

pub use eligibility::{cast_vote, evaluate, ApiVersion, CastVote, VoteRequest, DEFAULT_API_VERSION};
pub use error::VotingError;
pub use tally::{delete_all, delete_vote, get_vote, tally, Tally};
