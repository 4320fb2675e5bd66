//! Order lifecycle over HTTP: placement, pricing, status graph, visibility

mod common;

use common::{TestApp, approx, order_body};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_place_order_prices_from_catalog() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;

    let (status, body) = app.place_order(&customer, &catalog).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let order = &body["data"];
    assert_eq!(order["status"], "pending");
    assert_eq!(order["payment_status"], "pending");
    assert!(approx(&order["subtotal"], 25.5), "{}", order);
    assert!(approx(&order["delivery_fee"], 3.0));
    assert!(approx(&order["tax"], 1.5));
    assert!(approx(&order["total"], 30.0), "{}", order);
    assert_eq!(order["customer"], customer.id.as_str());
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][0]["name"], "Burger");
}

#[tokio::test]
async fn test_place_order_requires_token() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;

    let (status, body) = app
        .post("/api/orders", None, order_body(&catalog, 0.0))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    // Nothing was written
    let admin_token = app
        .state
        .get_jwt_service()
        .generate_token("user:nobody", shared::models::Role::Admin)
        .unwrap();
    let (status, _) = app.get("/api/admin/orders", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = app.admin().await;
    let (status, body) = app.get("/api/admin/orders", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_client_price_is_rejected() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;

    let (status, body) = app
        .post(
            "/api/orders",
            Some(&customer.token),
            json!({
                "restaurant": catalog.restaurant,
                "items": [{ "menu_item": catalog.burger, "quantity": 1, "price": 9.0 }],
                "delivery_address": common::address(),
                "payment_method": "cash",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4006);
}

#[tokio::test]
async fn test_unavailable_item_is_rejected() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;

    let (status, _) = app
        .put(
            &format!("/api/menu-items/{}", catalog.fries),
            Some(&catalog.owner.token),
            json!({ "is_available": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.place_order(&customer, &catalog).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6102);
}

#[tokio::test]
async fn test_minimum_order_enforced() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let owner = app
        .register("Olivia", "owner@restoo.test", "restaurant_owner")
        .await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;
    let category = app.create_category(&admin, "Mains").await;
    let restaurant = app.create_restaurant(&owner, "Steak House", 50.0).await;
    let steak = app
        .create_menu_item(&owner, &restaurant, &category, "Steak", 20.0)
        .await;

    let (status, body) = app
        .post(
            "/api/orders",
            Some(&customer.token),
            json!({
                "restaurant": restaurant,
                "items": [{ "menu_item": steak, "quantity": 1 }],
                "delivery_address": common::address(),
                "payment_method": "card",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4005);
}

#[tokio::test]
async fn test_full_lifecycle_and_partner_assignment() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;
    let partner = app
        .register("Dana", "dana@restoo.test", "delivery_partner")
        .await;

    let (_, body) = app.place_order(&customer, &catalog).await;
    let order = body["data"]["id"].as_str().unwrap().to_string();

    app.deliver(&catalog, &partner, &order).await;

    let (status, body) = app
        .get(&format!("/api/orders/{}", order), Some(&customer.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "delivered");
    assert_eq!(body["data"]["delivery_partner"], partner.id.as_str());
    assert!(body["data"]["actual_delivery_time"].is_i64());
    assert_eq!(body["data"]["version"], 5);

    // Terminal state
    let (status, body) = app
        .set_status(&catalog.owner.token, &order, "preparing")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);
}

#[tokio::test]
async fn test_partner_cannot_skip_ready_for_pickup() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;
    let partner = app
        .register("Dana", "dana@restoo.test", "delivery_partner")
        .await;

    let (_, body) = app.place_order(&customer, &catalog).await;
    let order = body["data"]["id"].as_str().unwrap().to_string();

    for status in ["confirmed", "preparing"] {
        let (code, _) = app.set_status(&catalog.owner.token, &order, status).await;
        assert_eq!(code, StatusCode::OK);
    }

    let (status, body) = app
        .set_status(&partner.token, &order, "out_for_delivery")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);
    assert_eq!(body["details"]["from"], "preparing");

    let (_, body) = app
        .get(&format!("/api/orders/{}", order), Some(&customer.token))
        .await;
    assert_eq!(body["data"]["status"], "preparing");
}

#[tokio::test]
async fn test_owner_edges_are_not_for_partners() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;
    let partner = app
        .register("Dana", "dana@restoo.test", "delivery_partner")
        .await;

    let (_, body) = app.place_order(&customer, &catalog).await;
    let order = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.set_status(&partner.token, &order, "confirmed").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Customers are not allowed on the status route at all
    let (status, body) = app.set_status(&customer.token, &order, "confirmed").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);
}

#[tokio::test]
async fn test_cancellation_window() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;

    let (_, body) = app.place_order(&customer, &catalog).await;
    let first = body["data"]["id"].as_str().unwrap().to_string();
    let (status, body) = app
        .put(
            &format!("/api/orders/{}/cancel", first),
            Some(&customer.token),
            json!({ "reason": "Changed my mind" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "cancelled");
    assert_eq!(body["data"]["cancellation_reason"], "Changed my mind");

    let (_, body) = app.place_order(&customer, &catalog).await;
    let second = body["data"]["id"].as_str().unwrap().to_string();
    for status in ["confirmed", "preparing"] {
        app.set_status(&catalog.owner.token, &second, status).await;
    }
    let (status, body) = app
        .put(
            &format!("/api/orders/{}/cancel", second),
            Some(&customer.token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);
}

#[tokio::test]
async fn test_update_only_while_pending() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;

    let (_, body) = app.place_order(&customer, &catalog).await;
    let order = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .put(
            &format!("/api/orders/{}", order),
            Some(&customer.token),
            json!({ "items": [{ "menu_item": catalog.fries, "quantity": 2 }], "tip": 2.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(approx(&body["data"]["subtotal"], 11.0));
    assert!(approx(&body["data"]["total"], 17.5), "{}", body);

    app.set_status(&catalog.owner.token, &order, "confirmed").await;
    let (status, body) = app
        .put(
            &format!("/api/orders/{}", order),
            Some(&customer.token),
            json!({ "tip": 5.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);
}

#[tokio::test]
async fn test_order_visibility() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;
    let stranger = app.register("Sam", "sam@restoo.test", "user").await;

    let (_, body) = app.place_order(&customer, &catalog).await;
    let order = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .get(&format!("/api/orders/{}", order), Some(&stranger.token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(&format!("/api/orders/{}", order), Some(&catalog.owner.token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/orders", Some(&stranger.token)).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, body) = app.get("/api/orders", Some(&catalog.owner.token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .get("/api/orders/order:missing", Some(&customer.token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payment_status_and_admin_delete() {
    let app = TestApp::new().await;
    let catalog = app.seed_catalog().await;
    let customer = app.register("Carl", "carl@restoo.test", "user").await;
    let admin = app.admin().await;

    let (_, body) = app.place_order(&customer, &catalog).await;
    let order = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(
            &format!("/api/orders/{}/payment-status", order),
            Some(&customer.token),
            json!({ "payment_status": "completed" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(
            &format!("/api/orders/{}/payment-status", order),
            Some(&catalog.owner.token),
            json!({ "payment_status": "completed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["payment_status"], "completed");

    let (status, _) = app
        .delete(&format!("/api/orders/{}", order), Some(&customer.token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/api/orders/{}", order), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .get(&format!("/api/orders/{}", order), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
