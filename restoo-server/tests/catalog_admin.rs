//! Catalog ownership, categories and the admin console

mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_public_catalog_reads() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;

    let (status, body) = app.get("/api/restaurants?cuisine=burg", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = app.get("/api/restaurants?city=Shelbyville", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, body) = app.get("/api/restaurants?search=barn", None).await;
    assert_eq!(body["data"][0]["id"], catalog.restaurant.as_str());

    let (status, body) = app
        .get(&format!("/api/restaurants/{}/menu", catalog.restaurant), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app.get("/api/restaurants/restaurant:missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);

    let (status, body) = app.get("/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Mains");
}

#[tokio::test]
async fn test_hidden_items_only_for_owner() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;

    app.put(
        &format!("/api/menu-items/{}", catalog.fries),
        Some(&catalog.owner.token),
        json!({ "is_available": false }),
    )
    .await;

    let menu = format!("/api/restaurants/{}/menu?all=true", catalog.restaurant);
    let (_, body) = app.get(&menu, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = app.get(&menu, Some(&customer.token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = app.get(&menu, Some(&catalog.owner.token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_restaurant_ownership() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let rival = app
        .register("Rita", "rita@restoo.test", "restaurant_owner")
        .await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;

    // Customers cannot open restaurants
    let (status, body) = app
        .post(
            "/api/restaurants",
            Some(&customer.token),
            json!({ "name": "Nope" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, body) = app
        .put(
            &format!("/api/restaurants/{}", catalog.restaurant),
            Some(&rival.token),
            json!({ "name": "Hijacked" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2004);

    let (status, _) = app
        .post(
            &format!("/api/restaurants/{}/menu", catalog.restaurant),
            Some(&rival.token),
            json!({
                "name": "Rival Burger",
                "category": catalog.category,
                "description": "Sneaky",
                "price": 1.0,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/api/menu-items/{}", catalog.burger), Some(&rival.token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(
            &format!("/api/restaurants/{}", catalog.restaurant),
            Some(&catalog.owner.token),
            json!({ "name": "Burger Palace", "rating": 5.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Burger Palace");
    assert_eq!(body["data"]["rating"], 0.0);

    // Owners cannot verify themselves
    let (status, _) = app
        .put(
            &format!("/api/restaurants/{}", catalog.restaurant),
            Some(&catalog.owner.token),
            json!({ "is_verified": true }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_menu_item_needs_existing_category() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;

    let (status, body) = app
        .post(
            "/api/menu-items",
            Some(&catalog.owner.token),
            json!({
                "name": "Shake",
                "restaurant": catalog.restaurant,
                "category": "category:missing",
                "description": "Vanilla",
                "price": 4.0,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6201);

    let (status, body) = app
        .post(
            "/api/menu-items",
            Some(&catalog.owner.token),
            json!({
                "name": "Shake",
                "restaurant": catalog.restaurant,
                "category": catalog.category,
                "description": "Vanilla",
                "price": 4.0,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["restaurant"], catalog.restaurant.as_str());
}

#[tokio::test]
async fn test_category_rules() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let admin = app.admin().await;

    let (status, body) = app
        .post("/api/categories", Some(&admin.token), json!({ "name": "Mains" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6202);

    let (status, body) = app
        .post(
            "/api/categories",
            Some(&catalog.owner.token),
            json!({ "name": "Desserts" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, body) = app
        .delete(&format!("/api/categories/{}", catalog.category), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6203);

    let sides = app.create_category(&admin, "Sides").await;
    let (status, _) = app
        .delete(&format!("/api/categories/{}", sides), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_restaurant_delete_cascades_to_menu() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let admin = app.admin().await;

    let (status, _) = app
        .delete(
            &format!("/api/restaurants/{}", catalog.restaurant),
            Some(&catalog.owner.token),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/api/restaurants/{}", catalog.restaurant), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .get(&format!("/api/menu-items/{}", catalog.burger), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The category is free again
    let (status, _) = app
        .delete(&format!("/api/categories/{}", catalog.category), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_console() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let admin = app.admin().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;

    let (status, body) = app.get("/api/admin/users", Some(&customer.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, body) = app.get("/api/admin/users", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().unwrap();
    assert!(users.len() >= 3);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    // Inactive restaurants only show up in the console
    app.put(
        &format!("/api/restaurants/{}", catalog.restaurant),
        Some(&catalog.owner.token),
        json!({ "is_active": false }),
    )
    .await;
    let (_, body) = app.get("/api/restaurants", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    let (_, body) = app.get("/api/admin/restaurants", Some(&admin.token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .put(
            &format!("/api/admin/users/{}/role", customer.id),
            Some(&admin.token),
            json!({ "role": "delivery_partner" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "delivery_partner");

    let (status, body) = app
        .delete(&format!("/api/admin/users/{}", admin.id), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2006);

    let (status, _) = app
        .delete(&format!("/api/admin/users/{}", customer.id), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/auth/me", Some(&customer.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");

    let (status, body) = app.get("/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
