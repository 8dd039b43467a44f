//! Menu endpoints, scoped to a restaurant.

use super::error::{internal, not_found};
use crate::day::{DayOfWeek, SharedClock};
use crate::middleware::ClientCtx;
use crate::orm::menus;
use crate::voting::{self, VotingError};
use actix_web::{delete, get, post, route, web, Error, HttpResponse, Responder};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_todays_menus)
        .service(create_menu)
        .service(view_menu)
        .service(update_menu)
        .service(delete_menu);
}

#[derive(Clone, Debug, Serialize)]
pub struct MenuView {
    pub id: i32,
    pub restaurant: i32,
    pub dish: String,
    pub day_of_week: DayOfWeek,
}

impl From<menus::Model> for MenuView {
    fn from(menu: menus::Model) -> Self {
        Self {
            id: menu.id,
            restaurant: menu.restaurant_id,
            dish: menu.dish,
            day_of_week: menu.day_of_week,
        }
    }
}

fn default_dish() -> String {
    "none".to_owned()
}

#[derive(Deserialize, Validate)]
pub struct MenuFormData {
    #[serde(default = "default_dish")]
    #[validate(length(min = 1, max = 255))]
    pub dish: String,
    #[serde(default)]
    pub day_of_week: DayOfWeek,
}

/// Body of a menu update. Only the dish may change; a `day_of_week` field is
/// rejected.
#[derive(Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MenuUpdateFormData {
    #[validate(length(min = 1, max = 255))]
    pub dish: String,
}

/// Today's menu of a restaurant, as a list.
#[get("/restaurants/{restaurant_id}/menus")]
pub async fn list_todays_menus(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    clock: web::Data<SharedClock>,
) -> Result<impl Responder, Error> {
    let restaurant_id = path.into_inner();

    let menus = voting::menus::list_for_day(db.get_ref(), restaurant_id, clock.today())
        .await
        .map_err(internal)?;

    Ok(HttpResponse::Ok().json(menus.into_iter().map(MenuView::from).collect::<Vec<_>>()))
}

#[post("/restaurants/{restaurant_id}/menus")]
pub async fn create_menu(
    client: ClientCtx,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    form: web::Json<MenuFormData>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    form.validate()
        .map_err(|e| super::error::bad_request(format!("Invalid menu: {}", e)))?;

    let menu = voting::menus::create_menu(
        db.get_ref(),
        path.into_inner(),
        form.dish.trim(),
        form.day_of_week,
    )
    .await?;

    Ok(HttpResponse::Created().json(MenuView::from(menu)))
}

#[get("/menus/{menu_id}")]
pub async fn view_menu(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<impl Responder, Error> {
    let menu = voting::menus::get_menu(db.get_ref(), path.into_inner())
        .await
        .map_err(VotingError::from)?
        .ok_or_else(|| not_found("Menu not found."))?;

    Ok(HttpResponse::Ok().json(MenuView::from(menu)))
}

#[route("/menus/{menu_id}", method = "PUT", method = "PATCH")]
pub async fn update_menu(
    client: ClientCtx,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    form: web::Json<MenuUpdateFormData>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    form.validate()
        .map_err(|e| super::error::bad_request(format!("Invalid menu: {}", e)))?;

    let menu = voting::menus::update_dish(db.get_ref(), path.into_inner(), form.dish.trim())
        .await
        .map_err(VotingError::from)?
        .ok_or_else(|| not_found("Menu not found."))?;

    Ok(HttpResponse::Ok().json(MenuView::from(menu)))
}

#[delete("/menus/{menu_id}")]
pub async fn delete_menu(
    client: ClientCtx,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let menu_id = path.into_inner();

    let deleted = voting::menus::delete_menu(db.get_ref(), menu_id)
        .await
        .map_err(VotingError::from)?;
    if !deleted {
        return Err(not_found("Menu not found."));
    }

    log::info!("Menu deleted: menu_id={} by user_id={}", menu_id, user_id);
    Ok(HttpResponse::NoContent().finish())
}
