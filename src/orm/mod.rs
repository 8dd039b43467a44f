//! SeaORM entities for the lunch voting tables.

pub mod menus;
pub mod restaurants;
pub mod users;
pub mod votes;
