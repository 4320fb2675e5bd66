//! Shared helpers for the HTTP-level tests
//!
//! Every [`TestApp`] owns a fresh in-memory database.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use restoo_server::auth::JwtConfig;
use restoo_server::auth::password::hash_password;
use restoo_server::db::repository::UserRepository;
use restoo_server::db::repository::user::NewUser;
use restoo_server::services::build_router;
use restoo_server::{Config, ServerState};
use shared::models::Role;

pub const TEST_SECRET: &str = "integration-test-secret-with-at-least-32-chars";
pub const PASSWORD: &str = "secret123";

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
}

/// A registered account
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub token: String,
}

/// Restaurant with a burger (10.00) and fries (5.50); delivery fee 3.00
#[derive(Debug, Clone)]
pub struct Catalog {
    pub owner: Account,
    pub restaurant: String,
    pub category: String,
    pub burger: String,
    pub fries: String,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::in_memory(JwtConfig::with_secret(TEST_SECRET))).await
    }

    pub async fn with_config(config: Config) -> Self {
        let state = ServerState::initialize(&config)
            .await
            .expect("initialize state");
        let router = build_router(state.clone());
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Register through the public endpoint
    pub async fn register(&self, name: &str, email: &str, role: &str) -> Account {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({ "name": name, "email": email, "password": PASSWORD, "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {}: {}", email, body);
        Account {
            id: body["data"]["user"]["id"].as_str().unwrap().to_string(),
            token: body["data"]["token"].as_str().unwrap().to_string(),
        }
    }

    /// Admins cannot self-register, so they are written straight to the store
    pub async fn admin(&self) -> Account {
        let user = UserRepository::new(self.state.get_db())
            .create(NewUser {
                name: "Root".into(),
                email: format!("admin-{}@restoo.test", uuid::Uuid::new_v4().simple()),
                password_hash: hash_password(PASSWORD).unwrap(),
                phone: None,
                role: Role::Admin,
                verification_token: None,
            })
            .await
            .unwrap();
        let token = self.state.get_jwt_service().token_for(&user).unwrap();
        Account {
            id: user.id_string(),
            token,
        }
    }

    pub async fn create_category(&self, admin: &Account, name: &str) -> String {
        let (status, body) = self
            .post(
                "/api/categories",
                Some(&admin.token),
                json!({ "name": name, "sort_order": 1 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "category: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn create_restaurant(&self, owner: &Account, name: &str, minimum_order: f64) -> String {
        let (status, body) = self
            .post(
                "/api/restaurants",
                Some(&owner.token),
                json!({
                    "name": name,
                    "description": "Burgers and fries",
                    "cuisine": ["American", "Burgers"],
                    "address": address(),
                    "delivery_fee": 3.0,
                    "minimum_order": minimum_order,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "restaurant: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn create_menu_item(
        &self,
        owner: &Account,
        restaurant: &str,
        category: &str,
        name: &str,
        price: f64,
    ) -> String {
        let (status, body) = self
            .post(
                &format!("/api/restaurants/{}/menu", restaurant),
                Some(&owner.token),
                json!({
                    "name": name,
                    "category": category,
                    "description": format!("{} description", name),
                    "price": price,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "menu item: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Owner, category, restaurant and two menu items
    pub async fn seed_catalog(&self) -> Catalog {
        let admin = self.admin().await;
        let owner = self
            .register("Olivia Owner", "owner@restoo.test", "restaurant_owner")
            .await;
        let category = self.create_category(&admin, "Mains").await;
        let restaurant = self.create_restaurant(&owner, "Burger Barn", 0.0).await;
        let burger = self
            .create_menu_item(&owner, &restaurant, &category, "Burger", 10.0)
            .await;
        let fries = self
            .create_menu_item(&owner, &restaurant, &category, "Fries", 5.5)
            .await;
        Catalog {
            owner,
            restaurant,
            category,
            burger,
            fries,
        }
    }

    /// Two burgers and one fries, tax 1.50
    pub async fn place_order(&self, customer: &Account, catalog: &Catalog) -> (StatusCode, Value) {
        self.post(
            "/api/orders",
            Some(&customer.token),
            order_body(catalog, 1.5),
        )
        .await
    }

    pub async fn set_status(&self, token: &str, order: &str, status: &str) -> (StatusCode, Value) {
        self.put(
            &format!("/api/orders/{}/status", order),
            Some(token),
            json!({ "status": status }),
        )
        .await
    }

    /// Walk an order to `delivered`
    pub async fn deliver(&self, catalog: &Catalog, partner: &Account, order: &str) {
        for status in ["confirmed", "preparing", "ready_for_pickup"] {
            let (code, body) = self.set_status(&catalog.owner.token, order, status).await;
            assert_eq!(code, StatusCode::OK, "{}: {}", status, body);
        }
        for status in ["out_for_delivery", "delivered"] {
            let (code, body) = self.set_status(&partner.token, order, status).await;
            assert_eq!(code, StatusCode::OK, "{}: {}", status, body);
        }
    }
}

pub fn address() -> Value {
    json!({
        "street": "1 Main St",
        "city": "Springfield",
        "state": "IL",
        "zip_code": "62701",
        "country": "US",
    })
}

pub fn order_body(catalog: &Catalog, tax: f64) -> Value {
    json!({
        "restaurant": catalog.restaurant,
        "items": [
            { "menu_item": catalog.burger, "quantity": 2 },
            { "menu_item": catalog.fries, "quantity": 1 },
        ],
        "delivery_address": address(),
        "payment_method": "card",
        "tax": tax,
    })
}

pub fn approx(value: &Value, expected: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|v| (v - expected).abs() < 1e-9)
}
