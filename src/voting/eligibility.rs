//! Vote eligibility engine.
//!
//! A user gets one vote per calendar day, whichever restaurant they pick.
//! The read-side checks below give friendly rejections; the unique index on
//! `votes (user_id, day_of_week)` is what actually guarantees the rule when
//! two submissions race.

use super::{menus::resolve, VotingError};
use crate::day::{Clock, DayOfWeek};
use crate::db::is_unique_violation;
use crate::orm::{menus, restaurants, votes};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use serde::Deserialize;

/// Version assumed when the `api-version` header is absent.
pub const DEFAULT_API_VERSION: &str = "1";

/// Request-shape variants, selected by the `api-version` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiVersion {
    /// The caller names the day explicitly.
    V1,
    /// The day is always today, per the server clock.
    V2,
}

impl ApiVersion {
    pub fn parse(raw: &str) -> Result<Self, VotingError> {
        match raw {
            "1" => Ok(ApiVersion::V1),
            "2" => Ok(ApiVersion::V2),
            other => Err(VotingError::UnsupportedVersion(other.to_owned())),
        }
    }
}

/// Body of a vote submission.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct VoteRequest {
    pub restaurant: Option<i32>,
    #[serde(default)]
    pub day_of_week: Option<String>,
}

/// A persisted vote together with the menu it was resolved to.
#[derive(Clone, Debug)]
pub struct CastVote {
    pub vote: votes::Model,
    pub menu: menus::Model,
}

/// Picks the day a request targets.
fn target_day(
    clock: &dyn Clock,
    request: &VoteRequest,
    version: ApiVersion,
) -> Result<DayOfWeek, VotingError> {
    match version {
        ApiVersion::V1 => {
            let symbol = request
                .day_of_week
                .as_deref()
                .filter(|s| !s.is_empty())
                .ok_or(VotingError::MissingDay)?;
            // No restaurant can publish a menu for a day that does not exist.
            DayOfWeek::from_symbol(symbol).ok_or(VotingError::NoMenuForDay)
        }
        ApiVersion::V2 => Ok(clock.today()),
    }
}

/// True if the user has a vote on any menu served on `day`.
pub async fn has_voted_on(
    db: &DatabaseConnection,
    user_id: i32,
    day: DayOfWeek,
) -> Result<bool, DbErr> {
    let existing = votes::Entity::find()
        .inner_join(menus::Entity)
        .filter(votes::Column::UserId.eq(user_id))
        .filter(menus::Column::DayOfWeek.eq(day))
        .one(db)
        .await?;
    Ok(existing.is_some())
}

/// Decides whether `user_id` may vote as requested and returns the menu the
/// vote would go to. Performs no writes.
///
/// Checks run in a fixed order and the first failure wins: restaurant,
/// version and day, menu, prior vote.
pub async fn evaluate(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    user_id: i32,
    request: &VoteRequest,
    api_version: &str,
) -> Result<menus::Model, VotingError> {
    let restaurant_id = request.restaurant.ok_or(VotingError::UnknownRestaurant)?;
    restaurants::Entity::find_by_id(restaurant_id)
        .one(db)
        .await?
        .ok_or(VotingError::UnknownRestaurant)?;

    let version = ApiVersion::parse(api_version)?;
    let day = target_day(clock, request, version)?;

    let menu = resolve(db, restaurant_id, day)
        .await?
        .ok_or(VotingError::NoMenuForDay)?;

    if has_voted_on(db, user_id, day).await? {
        return Err(VotingError::AlreadyVoted);
    }

    Ok(menu)
}

/// Inserts the vote row. A unique constraint violation means another vote for
/// the same user and day got there first.
pub async fn record_vote(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    user_id: i32,
    menu: &menus::Model,
) -> Result<votes::Model, VotingError> {
    votes::ActiveModel {
        user_id: Set(user_id),
        menu_id: Set(menu.id),
        day_of_week: Set(menu.day_of_week),
        created_at: Set(clock.now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            log::warn!(
                "Concurrent vote rejected by store: user_id={} day={}",
                user_id,
                menu.day_of_week
            );
            VotingError::AlreadyVoted
        } else {
            VotingError::Store(e)
        }
    })
}

/// Evaluates and, if eligible, records a vote.
pub async fn cast_vote(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    user_id: i32,
    request: &VoteRequest,
    api_version: &str,
) -> Result<CastVote, VotingError> {
    let menu = evaluate(db, clock, user_id, request, api_version).await?;
    let vote = record_vote(db, clock, user_id, &menu).await?;

    log::info!(
        "Vote cast: vote_id={} user_id={} menu_id={} day={}",
        vote.id,
        user_id,
        menu.id,
        menu.day_of_week
    );

    Ok(CastVote { vote, menu })
}
