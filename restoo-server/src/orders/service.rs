//! Order lifecycle engine
//!
//! Every mutation reads the order, runs the pure checks (graph, actor,
//! ownership), then writes conditionally on the status and version it read.

use shared::models::{Page, Role};
use shared::order::pricing::{compute_totals, to_decimal};
use shared::order::{
    CreateOrderRequest, OrderQuery, OrderStatus, PaymentStatus, StatusUpdateRequest,
    UpdateOrderRequest,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

use super::lifecycle::{self, Actor};
use super::payment::validate_payment_transition;
use super::reconcile::reconcile_items;
use crate::auth::{Action, CurrentUser, authorize};
use crate::db::models::{Order, OrderPatch, OrderScope, Restaurant};
use crate::db::repository::{
    MenuItemRepository, OrderRepository, RestaurantRepository, now_millis,
};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// How many times a review is re-applied when the order moves underneath it
const REVIEW_WRITE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    restaurants: RestaurantRepository,
    menu: MenuItemRepository,
}

fn order_not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::OrderNotFound).with_detail("order", id)
}

fn concurrent_modification(order: &Order) -> AppError {
    AppError::with_message(
        ErrorCode::ConcurrentModification,
        "Order was modified by another request, please reload and retry",
    )
    .with_detail("order", order.id_string())
}

impl OrderService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db.clone()),
            menu: MenuItemRepository::new(db),
        }
    }

    async fn load(&self, id: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| order_not_found(id))
    }

    async fn owns_restaurant(&self, caller: &CurrentUser, restaurant: &str) -> AppResult<bool> {
        if caller.role != Role::RestaurantOwner {
            return Ok(false);
        }
        Ok(self
            .restaurants
            .find_by_id(restaurant)
            .await?
            .is_some_and(|r| r.is_owned_by(&caller.id)))
    }

    /// Every relation the caller has to the order
    async fn actors(&self, caller: &CurrentUser, order: &Order) -> AppResult<Vec<Actor>> {
        let mut actors = Vec::new();
        if caller.is_admin() {
            actors.push(Actor::Admin);
        }
        if order.customer == caller.id {
            actors.push(Actor::Customer);
        }
        if self.owns_restaurant(caller, &order.restaurant).await? {
            actors.push(Actor::RestaurantOwner);
        }
        if caller.role == Role::DeliveryPartner {
            actors.push(Actor::DeliveryPartner);
        }
        Ok(actors)
    }

    async fn active_restaurant(&self, id: &str) -> AppResult<Restaurant> {
        let restaurant = self
            .restaurants
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurant", id))?;
        if !restaurant.is_active {
            return Err(AppError::new(ErrorCode::RestaurantInactive)
                .with_detail("restaurant", restaurant.id_string()));
        }
        Ok(restaurant)
    }

    fn check_minimum(subtotal: f64, restaurant: &Restaurant) -> AppResult<()> {
        if to_decimal(subtotal) < to_decimal(restaurant.minimum_order) {
            return Err(AppError::with_message(
                ErrorCode::BelowMinimumOrder,
                format!(
                    "Minimum order for {} is {:.2}",
                    restaurant.name, restaurant.minimum_order
                ),
            )
            .with_detail("minimum_order", restaurant.minimum_order)
            .with_detail("subtotal", subtotal));
        }
        Ok(())
    }

    /// Place an order for the caller
    pub async fn create(&self, caller: &CurrentUser, req: CreateOrderRequest) -> AppResult<Order> {
        req.validate()?;
        let restaurant = self.active_restaurant(&req.restaurant).await?;
        let restaurant_id = restaurant.id_string();

        let items = reconcile_items(&self.menu, &restaurant_id, &req.items).await?;
        let totals = compute_totals(
            &items,
            restaurant.delivery_fee,
            req.tax.unwrap_or(0.0),
            req.tip.unwrap_or(0.0),
        )?;
        Self::check_minimum(totals.subtotal, &restaurant)?;

        let order = Order {
            id: None,
            customer: caller.id.clone(),
            restaurant: restaurant_id,
            delivery_partner: None,
            items,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            tax: totals.tax,
            tip: totals.tip,
            total: totals.total,
            delivery_address: req.delivery_address,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: req.payment_method,
            estimated_delivery_time: None,
            actual_delivery_time: None,
            cancellation_reason: None,
            rating: None,
            review: None,
            version: 0,
            created_at: 0,
            updated_at: 0,
        };
        let order = self.orders.create(order).await?;

        tracing::info!(
            order_id = %order.id_string(),
            user_id = %caller.id,
            restaurant_id = %order.restaurant,
            total = order.total,
            "Order created"
        );
        Ok(order)
    }

    /// One order, if the caller may see it
    pub async fn get(&self, caller: &CurrentUser, id: &str) -> AppResult<Order> {
        let order = self.load(id).await?;
        let visible = caller.is_admin()
            || order.customer == caller.id
            || (caller.role == Role::DeliveryPartner
                && match &order.delivery_partner {
                    Some(partner) => *partner == caller.id,
                    None => order.status == OrderStatus::ReadyForPickup,
                })
            || self.owns_restaurant(caller, &order.restaurant).await?;

        if !visible {
            security_log!(
                "WARN",
                "order_access_denied",
                user_id = caller.id.clone(),
                order_id = order.id_string()
            );
            return Err(AppError::with_message(
                ErrorCode::NotResourceOwner,
                "Not authorized to access this order",
            ));
        }
        Ok(order)
    }

    /// Orders in the caller's scope
    pub async fn list(&self, caller: &CurrentUser, query: OrderQuery) -> AppResult<Vec<Order>> {
        let scope = match caller.role {
            Role::Admin => OrderScope::All,
            Role::RestaurantOwner => {
                OrderScope::Restaurants(self.restaurants.find_ids_by_owner(&caller.id).await?)
            }
            Role::DeliveryPartner => OrderScope::DeliveryPartner(caller.id.clone()),
            Role::User => OrderScope::Customer(caller.id.clone()),
        };
        self.list_scoped(scope, query).await
    }

    pub async fn list_scoped(&self, scope: OrderScope, query: OrderQuery) -> AppResult<Vec<Order>> {
        let page = Page {
            limit: query.limit,
            offset: query.offset,
        };
        Ok(self
            .orders
            .find_scoped(scope, query.status, page.limit(), page.offset())
            .await?)
    }

    /// Edit a pending order (customer or admin)
    pub async fn update(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: UpdateOrderRequest,
    ) -> AppResult<Order> {
        req.validate()?;
        let order = self.load(id).await?;

        if !(caller.is_admin() || order.customer == caller.id) {
            return Err(AppError::with_message(
                ErrorCode::NotResourceOwner,
                "Not authorized to update this order",
            ));
        }
        if order.status != OrderStatus::Pending {
            return Err(AppError::with_message(
                ErrorCode::OrderNotEditable,
                format!("Order is {} and can no longer be modified", order.status),
            )
            .with_detail("status", order.status.as_str()));
        }

        let mut patch = OrderPatch::default();
        let items = match &req.items {
            Some(inputs) => {
                let items = reconcile_items(&self.menu, &order.restaurant, inputs).await?;
                patch.items = Some(items.clone());
                items
            }
            None => order.items.clone(),
        };
        let tax = req.tax.unwrap_or(order.tax);
        let tip = req.tip.unwrap_or(order.tip);
        let totals = compute_totals(&items, order.delivery_fee, tax, tip)?;

        if req.items.is_some() {
            let restaurant = self
                .restaurants
                .find_by_id(&order.restaurant)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
            Self::check_minimum(totals.subtotal, &restaurant)?;
        }

        patch.subtotal = Some(totals.subtotal);
        patch.tax = Some(totals.tax);
        patch.tip = Some(totals.tip);
        patch.total = Some(totals.total);
        patch.delivery_address = req.delivery_address;
        patch.payment_method = req.payment_method;

        let updated = self
            .orders
            .update_if(&order.id_string(), order.status, order.version, patch)
            .await?
            .ok_or_else(|| concurrent_modification(&order))?;

        tracing::info!(
            order_id = %updated.id_string(),
            user_id = %caller.id,
            total = updated.total,
            "Order updated"
        );
        Ok(updated)
    }

    /// Move the order one edge along the lifecycle graph
    pub async fn advance_status(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: StatusUpdateRequest,
    ) -> AppResult<Order> {
        req.validate()?;
        let order = self.load(id).await?;
        let from = order.status;
        let to = req.status;

        lifecycle::validate_transition(from, to)?;
        let actors = self.actors(caller, &order).await?;
        lifecycle::authorize_transition(&actors, from, to)?;

        let mut patch = OrderPatch {
            status: Some(to),
            ..Default::default()
        };

        match to {
            OrderStatus::Confirmed => {
                patch.estimated_delivery_time = req.estimated_delivery_time;
            }
            OrderStatus::OutForDelivery | OrderStatus::Delivered => {
                if !caller.is_admin() {
                    match &order.delivery_partner {
                        Some(partner) if *partner != caller.id => {
                            security_log!(
                                "WARN",
                                "delivery_partner_mismatch",
                                user_id = caller.id.clone(),
                                order_id = order.id_string()
                            );
                            return Err(AppError::new(ErrorCode::DeliveryPartnerMismatch));
                        }
                        Some(_) => {}
                        None => patch.delivery_partner = Some(caller.id.clone()),
                    }
                }
                if to == OrderStatus::Delivered {
                    patch.actual_delivery_time = Some(now_millis());
                }
            }
            OrderStatus::Cancelled => {
                patch.cancellation_reason = req
                    .cancellation_reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty());
            }
            _ => {}
        }

        let updated = self
            .orders
            .update_if(&order.id_string(), from, order.version, patch)
            .await?
            .ok_or_else(|| {
                tracing::warn!(
                    order_id = %order.id_string(),
                    from = %from,
                    to = %to,
                    "Order status change lost a concurrent update"
                );
                concurrent_modification(&order)
            })?;

        tracing::info!(
            order_id = %updated.id_string(),
            user_id = %caller.id,
            from = %from,
            to = %to,
            "Order status changed"
        );
        Ok(updated)
    }

    /// Shorthand for advancing to `cancelled`
    pub async fn cancel(
        &self,
        caller: &CurrentUser,
        id: &str,
        reason: Option<String>,
    ) -> AppResult<Order> {
        self.advance_status(
            caller,
            id,
            StatusUpdateRequest {
                status: OrderStatus::Cancelled,
                estimated_delivery_time: None,
                cancellation_reason: reason,
            },
        )
        .await
    }

    /// Restaurant owner or admin moves the payment status
    pub async fn set_payment_status(
        &self,
        caller: &CurrentUser,
        id: &str,
        to: PaymentStatus,
    ) -> AppResult<Order> {
        let order = self.load(id).await?;
        if !(caller.is_admin() || self.owns_restaurant(caller, &order.restaurant).await?) {
            security_log!(
                "WARN",
                "payment_update_denied",
                user_id = caller.id.clone(),
                order_id = order.id_string()
            );
            return Err(AppError::with_message(
                ErrorCode::NotResourceOwner,
                "Not authorized to update payment of this order",
            ));
        }

        let from = order.payment_status;
        validate_payment_transition(from, to)?;

        let patch = OrderPatch {
            payment_status: Some(to),
            ..Default::default()
        };
        let updated = self
            .orders
            .update_if(&order.id_string(), order.status, order.version, patch)
            .await?
            .ok_or_else(|| concurrent_modification(&order))?;

        tracing::info!(
            order_id = %updated.id_string(),
            user_id = %caller.id,
            from = %from,
            to = %to,
            "Payment status changed"
        );
        Ok(updated)
    }

    /// Copy a review's rating and comment onto the order; `None` clears both
    pub async fn record_review(&self, id: &str, review: Option<(u8, &str)>) -> AppResult<Order> {
        for _ in 0..REVIEW_WRITE_ATTEMPTS {
            let order = self.load(id).await?;
            let patch = OrderPatch {
                rating: Some(review.map(|(rating, _)| rating)),
                review: Some(review.map(|(_, comment)| comment.to_string())),
                ..Default::default()
            };
            if let Some(updated) = self
                .orders
                .update_if(&order.id_string(), order.status, order.version, patch)
                .await?
            {
                return Ok(updated);
            }
        }
        Err(AppError::new(ErrorCode::ConcurrentModification).with_detail("order", id))
    }

    /// Hard delete (admin only)
    pub async fn delete(&self, caller: &CurrentUser, id: &str) -> AppResult<()> {
        authorize(caller, Action::DeleteOrder, None)?;
        let order = self.load(id).await?;
        if !self.orders.delete(&order.id_string()).await? {
            return Err(order_not_found(id));
        }
        tracing::info!(order_id = %order.id_string(), user_id = %caller.id, "Order deleted");
        Ok(())
    }
}
