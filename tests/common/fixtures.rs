//! Test fixtures for creating test data
#![allow(dead_code)]
#![allow(clippy::needless_update)]

use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;
use chrono::{TimeZone, Utc};
use lunch_voting::day::{DayOfWeek, FixedClock};
use lunch_voting::orm::{menus, restaurants, users, votes};
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};

/// Test user fixture
pub struct TestUser {
    pub id: i32,
    pub username: String,
    pub password: String, // Plain text password for testing
}

/// Create a test user with known credentials
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<TestUser, DbErr> {
    let password_hash = lunch_voting::session::hash_password(password)
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;

    let user = users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(Some(format!("{}@test.com", username))),
        password: Set(password_hash),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(TestUser {
        id: user.id,
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub async fn create_restaurant(
    db: &DatabaseConnection,
    name: &str,
) -> Result<restaurants::Model, DbErr> {
    restaurants::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_menu(
    db: &DatabaseConnection,
    restaurant_id: i32,
    dish: &str,
    day: DayOfWeek,
) -> Result<menus::Model, DbErr> {
    menus::ActiveModel {
        restaurant_id: Set(restaurant_id),
        dish: Set(dish.to_string()),
        day_of_week: Set(day),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Insert a vote row directly, skipping the eligibility checks.
pub async fn create_vote(
    db: &DatabaseConnection,
    user_id: i32,
    menu: &menus::Model,
) -> Result<votes::Model, DbErr> {
    votes::ActiveModel {
        user_id: Set(user_id),
        menu_id: Set(menu.id),
        day_of_week: Set(menu.day_of_week),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// A clock pinned to noon UTC on the given weekday of the week of 2024-01-01.
pub fn clock_on(day: DayOfWeek) -> FixedClock {
    let offset = match day {
        DayOfWeek::Mon => 0,
        DayOfWeek::Tue => 1,
        DayOfWeek::Wed => 2,
        DayOfWeek::Thu => 3,
        DayOfWeek::Fri => 4,
        DayOfWeek::Sat => 5,
        DayOfWeek::Sun => 6,
    };
    FixedClock::at(Utc.with_ymd_and_hms(2024, 1, 1 + offset, 12, 0, 0).unwrap())
}

/// Fixed signing key for session cookies in tests.
pub fn test_key() -> Key {
    Key::from(&[7u8; 64])
}

pub fn login_request(username: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({
            "username": username,
            "password": password,
        }))
}

/// Pulls the session cookie out of a login response.
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .next()
        .expect("Login response did not set a session cookie")
        .into_owned()
}
