//! Menu resolution and menu administration.

use super::VotingError;
use crate::day::DayOfWeek;
use crate::db::is_unique_violation;
use crate::orm::{menus, restaurants};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};

/// Finds the unique menu a restaurant publishes for `day`.
pub async fn resolve(
    db: &DatabaseConnection,
    restaurant_id: i32,
    day: DayOfWeek,
) -> Result<Option<menus::Model>, DbErr> {
    menus::Entity::find()
        .filter(menus::Column::RestaurantId.eq(restaurant_id))
        .filter(menus::Column::DayOfWeek.eq(day))
        .one(db)
        .await
}

/// Menus of a restaurant for one day. At most one element.
pub async fn list_for_day(
    db: &DatabaseConnection,
    restaurant_id: i32,
    day: DayOfWeek,
) -> Result<Vec<menus::Model>, DbErr> {
    menus::Entity::find()
        .filter(menus::Column::RestaurantId.eq(restaurant_id))
        .filter(menus::Column::DayOfWeek.eq(day))
        .order_by_asc(menus::Column::Id)
        .all(db)
        .await
}

/// Publishes a menu for (restaurant, day).
pub async fn create_menu(
    db: &DatabaseConnection,
    restaurant_id: i32,
    dish: &str,
    day: DayOfWeek,
) -> Result<menus::Model, VotingError> {
    restaurants::Entity::find_by_id(restaurant_id)
        .one(db)
        .await?
        .ok_or(VotingError::UnknownRestaurant)?;

    if resolve(db, restaurant_id, day).await?.is_some() {
        return Err(VotingError::DuplicateMenu);
    }

    let menu = menus::ActiveModel {
        restaurant_id: Set(restaurant_id),
        dish: Set(dish.to_owned()),
        day_of_week: Set(day),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| {
        // Lost a race against a concurrent insert for the same day.
        if is_unique_violation(&e) {
            VotingError::DuplicateMenu
        } else {
            VotingError::Store(e)
        }
    })?;

    log::info!(
        "Menu created: menu_id={} restaurant_id={} day={}",
        menu.id,
        restaurant_id,
        day.display_name()
    );

    Ok(menu)
}

pub async fn get_menu(
    db: &DatabaseConnection,
    menu_id: i32,
) -> Result<Option<menus::Model>, DbErr> {
    menus::Entity::find_by_id(menu_id).one(db).await
}

/// Replaces the dish of a menu. The day stays fixed since votes copy it.
/// Returns `None` if no such menu exists.
pub async fn update_dish(
    db: &DatabaseConnection,
    menu_id: i32,
    dish: &str,
) -> Result<Option<menus::Model>, DbErr> {
    let menu = match get_menu(db, menu_id).await? {
        Some(menu) => menu,
        None => return Ok(None),
    };

    let mut active: menus::ActiveModel = menu.into();
    active.dish = Set(dish.to_owned());
    let menu = active.update(db).await?;

    log::info!("Menu updated: menu_id={} dish={}", menu.id, menu.dish);
    Ok(Some(menu))
}

/// Deletes a menu and, through the cascade, its votes. Returns false if no
/// such menu existed.
pub async fn delete_menu(db: &DatabaseConnection, menu_id: i32) -> Result<bool, DbErr> {
    let res = menus::Entity::delete_many()
        .filter(menus::Column::Id.eq(menu_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}
