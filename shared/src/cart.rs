//! Client-side cart
//!
//! A cart holds items of a single restaurant. Adding an item from another
//! restaurant discards the current contents first. Totals are derived with
//! the same [`pricing`](crate::order::pricing) functions the server uses, so
//! the estimate shown at checkout matches what the order will store.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};
use crate::order::pricing::{self, OrderTotals, PricedLine};
use crate::order::{
    CreateOrderRequest, CustomizationInput, DeliveryAddress, OrderItemInput, PaymentMethod,
    SelectedCustomization,
};

/// Restaurant the cart is bound to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRestaurant {
    pub id: String,
    pub name: String,
    pub delivery_fee: f64,
    #[serde(default)]
    pub minimum_order: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub menu_item: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub customizations: Vec<SelectedCustomization>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

impl CartItem {
    /// Same menu item with the same choices collapses into one line
    fn same_line(&self, other: &CartItem) -> bool {
        self.menu_item == other.menu_item
            && self.customizations == other.customizations
            && self.special_instructions == other.special_instructions
    }
}

impl PricedLine for CartItem {
    fn unit_price(&self) -> f64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn customizations(&self) -> &[SelectedCustomization] {
        &self.customizations
    }
}

/// What [`Cart::add_item`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended as a new line
    Added,
    /// Quantity of an identical line was increased
    Merged,
    /// Cart belonged to another restaurant and was restarted
    Replaced { discarded_lines: usize },
    /// Zero quantity, nothing changed
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    restaurant: Option<CartRestaurant>,
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restaurant(&self) -> Option<&CartRestaurant> {
        self.restaurant.as_ref()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line quantities are capped at [`pricing::MAX_QUANTITY`]
    pub fn add_item(&mut self, restaurant: CartRestaurant, mut item: CartItem) -> AddOutcome {
        if item.quantity == 0 {
            return AddOutcome::Ignored;
        }
        item.quantity = item.quantity.min(pricing::MAX_QUANTITY);

        let mut outcome = AddOutcome::Added;
        match &self.restaurant {
            Some(current) if current.id != restaurant.id => {
                outcome = AddOutcome::Replaced {
                    discarded_lines: self.items.len(),
                };
                self.items.clear();
                self.restaurant = Some(restaurant);
            }
            Some(_) => {}
            None => self.restaurant = Some(restaurant),
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.same_line(&item)) {
            existing.quantity = existing
                .quantity
                .saturating_add(item.quantity)
                .min(pricing::MAX_QUANTITY);
            if outcome == AddOutcome::Added {
                outcome = AddOutcome::Merged;
            }
        } else {
            self.items.push(item);
        }
        outcome
    }

    /// Remove every line of the given menu item
    pub fn remove_item(&mut self, menu_item: &str) {
        self.items.retain(|i| i.menu_item != menu_item);
        self.forget_restaurant_if_empty();
    }

    /// Set a line's quantity; zero or less removes the line, larger values
    /// are capped at [`pricing::MAX_QUANTITY`]
    pub fn update_quantity(&mut self, line: usize, quantity: i64) {
        if line >= self.items.len() {
            return;
        }
        if quantity <= 0 {
            self.items.remove(line);
            self.forget_restaurant_if_empty();
        } else {
            let capped = quantity.min(i64::from(pricing::MAX_QUANTITY));
            self.items[line].quantity = u32::try_from(capped).unwrap_or(pricing::MAX_QUANTITY);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.restaurant = None;
    }

    /// Number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, i| total.saturating_add(i.quantity))
    }

    pub fn subtotal(&self) -> f64 {
        pricing::to_f64(pricing::subtotal(&self.items))
    }

    /// Totals the order would get with the given tax and tip
    pub fn estimate(&self, tax: f64, tip: f64) -> AppResult<OrderTotals> {
        let delivery_fee = self.restaurant.as_ref().map_or(0.0, |r| r.delivery_fee);
        pricing::compute_totals(&self.items, delivery_fee, tax, tip)
    }

    pub fn meets_minimum(&self) -> bool {
        let minimum = self.restaurant.as_ref().map_or(0.0, |r| r.minimum_order);
        pricing::subtotal(&self.items) >= pricing::to_decimal(minimum)
    }

    /// Snapshot the cart into a create-order request
    pub fn checkout(
        &self,
        delivery_address: DeliveryAddress,
        payment_method: PaymentMethod,
        tax: f64,
        tip: f64,
    ) -> AppResult<CreateOrderRequest> {
        let restaurant = match &self.restaurant {
            Some(r) if !self.items.is_empty() => r,
            _ => return Err(AppError::new(ErrorCode::OrderEmpty)),
        };
        if !self.meets_minimum() {
            return Err(AppError::new(ErrorCode::BelowMinimumOrder)
                .with_detail("minimum_order", restaurant.minimum_order)
                .with_detail("subtotal", self.subtotal()));
        }
        // Validates amounts the same way the server will
        self.estimate(tax, tip)?;

        let items = self
            .items
            .iter()
            .map(|i| OrderItemInput {
                menu_item: i.menu_item.clone(),
                quantity: i.quantity,
                price: Some(i.price),
                customizations: i
                    .customizations
                    .iter()
                    .map(|c| CustomizationInput {
                        name: c.name.clone(),
                        option: c.option.clone(),
                        price: Some(c.price),
                    })
                    .collect(),
                special_instructions: i.special_instructions.clone(),
            })
            .collect();

        Ok(CreateOrderRequest {
            restaurant: restaurant.id.clone(),
            items,
            delivery_address,
            payment_method,
            tax: Some(tax),
            tip: Some(tip),
        })
    }

    fn forget_restaurant_if_empty(&mut self) {
        if self.items.is_empty() {
            self.restaurant = None;
        }
    }
}
