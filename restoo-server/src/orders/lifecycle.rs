//! Order status graph
//!
//! ```text
//! pending → confirmed → preparing → ready_for_pickup → out_for_delivery → delivered
//!    │          │
//!    └──────────┴──→ cancelled
//! ```
//!
//! Each edge names the party allowed to take it. Admins may take any edge
//! but never leave the graph.

use shared::order::OrderStatus;

use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Relation of the caller to an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Customer,
    RestaurantOwner,
    DeliveryPartner,
    Admin,
}

impl Actor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Customer => "customer",
            Actor::RestaurantOwner => "restaurant_owner",
            Actor::DeliveryPartner => "delivery_partner",
            Actor::Admin => "admin",
        }
    }
}

/// Party owning the edge `from → to`, or `None` if it is not an edge
pub fn edge_owner(from: OrderStatus, to: OrderStatus) -> Option<Actor> {
    use OrderStatus::*;

    match (from, to) {
        (Pending, Confirmed) | (Confirmed, Preparing) | (Preparing, ReadyForPickup) => {
            Some(Actor::RestaurantOwner)
        }
        (ReadyForPickup, OutForDelivery) | (OutForDelivery, Delivered) => {
            Some(Actor::DeliveryPartner)
        }
        (Pending, Cancelled) | (Confirmed, Cancelled) => Some(Actor::Customer),
        _ => None,
    }
}

/// Statuses reachable in one step from `from`
pub fn next_statuses(from: OrderStatus) -> Vec<OrderStatus> {
    OrderStatus::ALL
        .into_iter()
        .filter(|to| edge_owner(from, *to).is_some())
        .collect()
}

/// Reject anything that is not an edge of the graph
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> AppResult<Actor> {
    edge_owner(from, to).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot change order status from {} to {}", from, to),
        )
        .with_detail("from", from.as_str())
        .with_detail("to", to.as_str())
    })
}

/// Check that one of the caller's relations to the order may take `from → to`
///
/// The edge is validated first, so a non-edge is always a validation error
/// whoever asks.
pub fn authorize_transition(actors: &[Actor], from: OrderStatus, to: OrderStatus) -> AppResult<()> {
    let owner = validate_transition(from, to)?;
    if actors.iter().any(|a| *a == owner || *a == Actor::Admin) {
        return Ok(());
    }

    let roles: Vec<&str> = actors.iter().map(|a| a.as_str()).collect();
    security_log!(
        "WARN",
        "transition_denied",
        from = from.as_str(),
        to = to.as_str(),
        actors = roles.join(",")
    );
    Err(AppError::with_message(
        ErrorCode::PermissionDenied,
        format!("Not authorized to change order status from {} to {}", from, to),
    )
    .with_detail("required", owner.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    const HAPPY_PATH: [OrderStatus; 6] = [
        Pending,
        Confirmed,
        Preparing,
        ReadyForPickup,
        OutForDelivery,
        Delivered,
    ];

    #[test]
    fn test_happy_path_is_a_chain() {
        for pair in HAPPY_PATH.windows(2) {
            assert!(edge_owner(pair[0], pair[1]).is_some(), "{:?}", pair);
        }
    }

    #[test]
    fn test_no_edge_skips_a_state() {
        for (i, from) in HAPPY_PATH.iter().enumerate() {
            for to in HAPPY_PATH.iter().skip(i + 2) {
                assert!(validate_transition(*from, *to).is_err(), "{} -> {}", from, to);
            }
            // Never backwards
            for to in HAPPY_PATH.iter().take(i + 1) {
                assert!(validate_transition(*from, *to).is_err(), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_terminal_statuses_have_no_exit() {
        for from in [Delivered, Cancelled] {
            assert!(next_statuses(from).is_empty());
            for to in OrderStatus::ALL {
                let err = authorize_transition(&[Actor::Admin], from, to).unwrap_err();
                assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
            }
        }
    }

    #[test]
    fn test_cancellation_only_early() {
        for from in OrderStatus::ALL {
            let allowed = validate_transition(from, Cancelled).is_ok();
            assert_eq!(allowed, matches!(from, Pending | Confirmed), "{}", from);
        }
        let err = validate_transition(Preparing, Cancelled).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(
            err.message,
            "Cannot change order status from preparing to cancelled"
        );
    }

    #[test]
    fn test_edge_owners() {
        assert!(authorize_transition(&[Actor::RestaurantOwner], Pending, Confirmed).is_ok());
        assert!(authorize_transition(&[Actor::RestaurantOwner], Preparing, ReadyForPickup).is_ok());
        assert!(authorize_transition(&[Actor::DeliveryPartner], ReadyForPickup, OutForDelivery).is_ok());
        assert!(authorize_transition(&[Actor::Customer], Confirmed, Cancelled).is_ok());

        let err = authorize_transition(&[Actor::Customer], Pending, Confirmed).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        let err = authorize_transition(&[Actor::RestaurantOwner], OutForDelivery, Delivered)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_admin_takes_every_edge() {
        for from in OrderStatus::ALL {
            for to in next_statuses(from) {
                assert!(authorize_transition(&[Actor::Admin], from, to).is_ok());
            }
        }
    }

    #[test]
    fn test_any_relation_suffices() {
        // An owner ordering from their own restaurant can still cancel
        let actors = [Actor::RestaurantOwner, Actor::Customer];
        assert!(authorize_transition(&actors, Pending, Cancelled).is_ok());
        assert!(authorize_transition(&actors, Pending, Confirmed).is_ok());
    }

    #[test]
    fn test_partner_cannot_skip_kitchen() {
        // preparing -> out_for_delivery is not an edge: validation, not permission
        let err =
            authorize_transition(&[Actor::DeliveryPartner], Preparing, OutForDelivery).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }
}
