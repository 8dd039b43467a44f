//! Vote aggregation, single-vote lookup and removal, and the administrative
//! reset.

use super::CastVote;
use crate::day::DayOfWeek;
use crate::orm::{menus, restaurants, votes};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, FromQueryResult};
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, FromQueryResult)]
struct VoteLabelRow {
    dish: String,
    restaurant_name: String,
}

/// Vote counts keyed by "dish (restaurant)", in order of first vote.
///
/// Serializes as a JSON object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(String, u64)>,
}

impl Tally {
    pub fn label(dish: &str, restaurant_name: &str) -> String {
        format!("{} ({})", dish, restaurant_name)
    }

    fn add(&mut self, label: String) {
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((label, 1)),
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

/// Counts the votes cast on menus served on `day`.
pub async fn tally(db: &DatabaseConnection, day: DayOfWeek) -> Result<Tally, DbErr> {
    let rows = votes::Entity::find()
        .select_only()
        .column_as(menus::Column::Dish, "dish")
        .column_as(restaurants::Column::Name, "restaurant_name")
        .join(JoinType::InnerJoin, votes::Relation::Menu.def())
        .join(JoinType::InnerJoin, menus::Relation::Restaurant.def())
        .filter(menus::Column::DayOfWeek.eq(day))
        .order_by_asc(votes::Column::Id)
        .into_model::<VoteLabelRow>()
        .all(db)
        .await?;

    let mut tally = Tally::default();
    for row in rows {
        tally.add(Tally::label(&row.dish, &row.restaurant_name));
    }
    Ok(tally)
}

/// Loads one vote together with its menu.
pub async fn get_vote(db: &DatabaseConnection, vote_id: i32) -> Result<Option<CastVote>, DbErr> {
    let found = votes::Entity::find_by_id(vote_id)
        .find_also_related(menus::Entity)
        .one(db)
        .await?;

    Ok(match found {
        Some((vote, Some(menu))) => Some(CastVote { vote, menu }),
        _ => None,
    })
}

/// Removes a single vote, which frees that user's day again. Returns false if
/// no such vote existed.
pub async fn delete_vote(db: &DatabaseConnection, vote_id: i32) -> Result<bool, DbErr> {
    let res = votes::Entity::delete_many()
        .filter(votes::Column::Id.eq(vote_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// Removes every vote regardless of day. Returns how many were removed.
pub async fn delete_all(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let res = votes::Entity::delete_many().exec(db).await?;
    log::info!("Deleted all votes: count={}", res.rows_affected);
    Ok(res.rows_affected)
}
