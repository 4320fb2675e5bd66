//! Payment status transitions
//!
//! Independent of the order status. `refunded` is terminal.

use shared::order::PaymentStatus;

use crate::utils::{AppError, AppResult, ErrorCode};

pub fn can_transition(from: PaymentStatus, to: PaymentStatus) -> bool {
    use PaymentStatus::*;

    matches!(
        (from, to),
        (Pending, Processing)
            | (Pending, Completed)
            | (Pending, Failed)
            | (Processing, Completed)
            | (Processing, Failed)
            | (Failed, Processing)
            | (Completed, Refunded)
    )
}

pub fn validate_payment_transition(from: PaymentStatus, to: PaymentStatus) -> AppResult<()> {
    if can_transition(from, to) {
        return Ok(());
    }
    Err(AppError::with_message(
        ErrorCode::InvalidPaymentTransition,
        format!("Cannot change payment status from {} to {}", from, to),
    )
    .with_detail("from", from.as_str())
    .with_detail("to", to.as_str()))
}
