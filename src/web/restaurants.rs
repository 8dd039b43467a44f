//! Restaurant administration endpoints

use super::error::{bad_request, internal, not_found};
use crate::db::is_unique_violation;
use crate::middleware::ClientCtx;
use crate::orm::restaurants;
use actix_web::{delete, get, post, put, web, Error, HttpResponse, Responder};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_restaurants)
        .service(create_restaurant)
        .service(view_restaurant)
        .service(update_restaurant)
        .service(delete_restaurant);
}

#[derive(Serialize)]
pub struct RestaurantView {
    pub id: i32,
    pub name: String,
}

impl From<restaurants::Model> for RestaurantView {
    fn from(r: restaurants::Model) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct RestaurantFormData {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

async fn name_taken(
    db: &DatabaseConnection,
    name: &str,
    except_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = restaurants::Entity::find().filter(restaurants::Column::Name.eq(name));
    if let Some(id) = except_id {
        query = query.filter(restaurants::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

fn map_write_error(e: DbErr) -> Error {
    if is_unique_violation(&e) {
        bad_request("A restaurant with this name already exists.")
    } else {
        internal(e)
    }
}

#[get("/restaurants")]
pub async fn list_restaurants(db: web::Data<DatabaseConnection>) -> Result<impl Responder, Error> {
    let list = restaurants::Entity::find()
        .order_by_asc(restaurants::Column::Id)
        .all(db.get_ref())
        .await
        .map_err(internal)?;

    Ok(HttpResponse::Ok().json(
        list.into_iter()
            .map(RestaurantView::from)
            .collect::<Vec<_>>(),
    ))
}

#[post("/restaurants")]
pub async fn create_restaurant(
    client: ClientCtx,
    db: web::Data<DatabaseConnection>,
    form: web::Json<RestaurantFormData>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    form.validate()
        .map_err(|e| bad_request(format!("Invalid restaurant: {}", e)))?;

    let name = form.name.trim();
    if name_taken(db.get_ref(), name, None).await.map_err(internal)? {
        return Err(bad_request("A restaurant with this name already exists."));
    }

    let restaurant = restaurants::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db.get_ref())
    .await
    .map_err(map_write_error)?;

    log::info!(
        "Restaurant created: restaurant_id={} name={}",
        restaurant.id,
        restaurant.name
    );
    Ok(HttpResponse::Created().json(RestaurantView::from(restaurant)))
}

#[get("/restaurants/{restaurant_id}")]
pub async fn view_restaurant(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<impl Responder, Error> {
    let restaurant = restaurants::Entity::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Restaurant not found."))?;

    Ok(HttpResponse::Ok().json(RestaurantView::from(restaurant)))
}

#[put("/restaurants/{restaurant_id}")]
pub async fn update_restaurant(
    client: ClientCtx,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    form: web::Json<RestaurantFormData>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    form.validate()
        .map_err(|e| bad_request(format!("Invalid restaurant: {}", e)))?;

    let restaurant_id = path.into_inner();
    let existing = restaurants::Entity::find_by_id(restaurant_id)
        .one(db.get_ref())
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Restaurant not found."))?;

    let name = form.name.trim();
    if name_taken(db.get_ref(), name, Some(restaurant_id))
        .await
        .map_err(internal)?
    {
        return Err(bad_request("A restaurant with this name already exists."));
    }

    let mut active: restaurants::ActiveModel = existing.into();
    active.name = Set(name.to_owned());
    let restaurant = active
        .update(db.get_ref())
        .await
        .map_err(map_write_error)?;

    Ok(HttpResponse::Ok().json(RestaurantView::from(restaurant)))
}

/// Deletes a restaurant along with its menus and their votes.
#[delete("/restaurants/{restaurant_id}")]
pub async fn delete_restaurant(
    client: ClientCtx,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let restaurant_id = path.into_inner();

    let res = restaurants::Entity::delete_many()
        .filter(restaurants::Column::Id.eq(restaurant_id))
        .exec(db.get_ref())
        .await
        .map_err(internal)?;
    if res.rows_affected == 0 {
        return Err(not_found("Restaurant not found."));
    }

    log::info!(
        "Restaurant deleted: restaurant_id={} by user_id={}",
        restaurant_id,
        user_id
    );
    Ok(HttpResponse::NoContent().finish())
}
