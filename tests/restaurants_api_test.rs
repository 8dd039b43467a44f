//! HTTP tests for restaurant and menu administration

mod common;
use serial_test::serial;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::{database::*, fixtures::*};
use lunch_voting::day::{DayOfWeek, SharedClock};
use lunch_voting::session::session_middleware;
use lunch_voting::web::configure_extractors;
use std::sync::Arc;

#[actix_rt::test]
#[serial]
async fn test_restaurant_crud() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let user = create_test_user(&db, "rest_admin", "password123")
        .await
        .expect("Failed to create user");
    let clock: SharedClock = Arc::new(clock_on(DayOfWeek::Mon));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db))
            .app_data(web::Data::new(clock))
            .configure(configure_extractors)
            .wrap(session_middleware(test_key(), false, 24))
            .configure(lunch_voting::web::configure),
    )
    .await;

    // Guests can read but not write.
    let req = test::TestRequest::post()
        .uri("/restaurants")
        .set_json(serde_json::json!({ "name": "Trattoria" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        login_request(&user.username, &user.password).to_request(),
    )
    .await;
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri("/restaurants")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "name": "Trattoria" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["name"], "Trattoria");
    let id = created["id"].as_i64().expect("id should be a number");

    // Names are unique.
    let req = test::TestRequest::post()
        .uri("/restaurants")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "name": "Trattoria" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/restaurants")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "name": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/restaurants").to_request();
    let list: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, serde_json::json!([{ "id": id, "name": "Trattoria" }]));

    let req = test::TestRequest::put()
        .uri(&format!("/restaurants/{}", id))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "name": "Osteria" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/restaurants/{}", id))
        .to_request();
    let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["name"], "Osteria");

    let req = test::TestRequest::delete()
        .uri(&format!("/restaurants/{}", id))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/restaurants/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/restaurants/{}", id))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
#[serial]
async fn test_menu_endpoints() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let user = create_test_user(&db, "menu_admin", "password123")
        .await
        .expect("Failed to create user");
    let a = create_restaurant(&db, "A").await.expect("restaurant");
    let clock: SharedClock = Arc::new(clock_on(DayOfWeek::Tue));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db))
            .app_data(web::Data::new(clock))
            .configure(configure_extractors)
            .wrap(session_middleware(test_key(), false, 24))
            .configure(lunch_voting::web::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        login_request(&user.username, &user.password).to_request(),
    )
    .await;
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri(&format!("/restaurants/{}/menus", a.id))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "dish": "Goulash", "day_of_week": "tue" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let menu: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(menu["restaurant"], a.id);
    assert_eq!(menu["dish"], "Goulash");
    assert_eq!(menu["day_of_week"], "tue");
    let menu_id = menu["id"].as_i64().expect("id should be a number");

    // Same restaurant, same day
    let req = test::TestRequest::post()
        .uri(&format!("/restaurants/{}/menus", a.id))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "dish": "Stew", "day_of_week": "tue" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Defaults apply when fields are omitted.
    let req = test::TestRequest::post()
        .uri(&format!("/restaurants/{}/menus", a.id))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let defaulted: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(defaulted["dish"], "none");
    assert_eq!(defaulted["day_of_week"], "mon");

    // Not a day symbol
    let req = test::TestRequest::post()
        .uri(&format!("/restaurants/{}/menus", a.id))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "dish": "Soup", "day_of_week": "tuesday" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/restaurants/999999/menus")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "dish": "Soup", "day_of_week": "wed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Listing shows only today's menu.
    let req = test::TestRequest::get()
        .uri(&format!("/restaurants/{}/menus", a.id))
        .to_request();
    let list: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        list,
        serde_json::json!([{
            "id": menu_id,
            "restaurant": a.id,
            "dish": "Goulash",
            "day_of_week": "tue",
        }])
    );

    let req = test::TestRequest::get()
        .uri(&format!("/menus/{}", menu_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/menus/{}", menu_id))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/menus/{}", menu_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/restaurants/{}/menus", a.id))
        .to_request();
    let list: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, serde_json::json!([]));
}

#[actix_rt::test]
#[serial]
async fn test_menu_dish_update() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let user = create_test_user(&db, "menu_editor", "password123")
        .await
        .expect("Failed to create user");
    let a = create_restaurant(&db, "A").await.expect("restaurant");
    let menu = create_menu(&db, a.id, "Pizza", DayOfWeek::Mon).await.expect("menu");
    create_vote(&db, user.id, &menu).await.expect("vote");
    let clock: SharedClock = Arc::new(clock_on(DayOfWeek::Mon));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db))
            .app_data(web::Data::new(clock))
            .configure(configure_extractors)
            .wrap(session_middleware(test_key(), false, 24))
            .configure(lunch_voting::web::configure),
    )
    .await;

    let req = test::TestRequest::put()
        .uri(&format!("/menus/{}", menu.id))
        .set_json(serde_json::json!({ "dish": "Calzone" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        login_request(&user.username, &user.password).to_request(),
    )
    .await;
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::put()
        .uri(&format!("/menus/{}", menu.id))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "dish": "Calzone" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(updated["dish"], "Calzone");
    assert_eq!(updated["day_of_week"], "mon");

    let req = test::TestRequest::patch()
        .uri(&format!("/menus/{}", menu.id))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "dish": "Focaccia" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The day is fixed once published.
    let req = test::TestRequest::patch()
        .uri(&format!("/menus/{}", menu.id))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "dish": "Focaccia", "day_of_week": "tue" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/menus/999999")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "dish": "Ghost" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Existing votes follow the new dish name.
    let req = test::TestRequest::get()
        .uri("/votes")
        .cookie(cookie)
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, serde_json::json!({ "results": { "Focaccia (A)": 1 } }));
}
