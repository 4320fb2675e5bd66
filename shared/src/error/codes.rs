//! Unified error codes for Restoo
//!
//! Error codes are shared by the server and any Rust client and are organized
//! by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Catalog errors (restaurants, menu items, categories)
//! - 7xxx: Review errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize as plain
/// numbers in the JSON envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format (ids, JSON bodies)
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Caller does not own the resource
    NotResourceOwner = 2004,
    /// Admin accounts cannot be self-registered
    CannotRegisterAdmin = 2005,
    /// Admin cannot delete own account
    CannotDeleteSelf = 2006,

    // ==================== 3xxx: Account ====================
    /// User not found
    UserNotFound = 3001,
    /// Email already registered
    EmailExists = 3002,
    /// Password reset token invalid or expired
    InvalidResetToken = 3003,
    /// Email verification token invalid
    InvalidVerificationToken = 3004,
    /// Password too short
    PasswordTooShort = 3005,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Requested status change is not an edge of the lifecycle graph
    InvalidStatusTransition = 4003,
    /// Order can no longer be edited
    OrderNotEditable = 4004,
    /// Subtotal below the restaurant's minimum order
    BelowMinimumOrder = 4005,
    /// Client price snapshot differs from the catalog
    PriceChanged = 4006,
    /// Order was modified concurrently
    ConcurrentModification = 4007,
    /// Order is assigned to another delivery partner
    DeliveryPartnerMismatch = 4008,

    // ==================== 5xxx: Payment ====================
    /// Requested payment status change is not allowed
    InvalidPaymentTransition = 5001,
    /// Invalid payment method
    PaymentInvalidMethod = 5002,

    // ==================== 6xxx: Catalog ====================
    /// Restaurant not found
    RestaurantNotFound = 6001,
    /// Restaurant is not accepting orders
    RestaurantInactive = 6002,
    /// Menu item not found
    MenuItemNotFound = 6101,
    /// Menu item is not available
    MenuItemUnavailable = 6102,
    /// Menu item belongs to another restaurant
    MenuItemWrongRestaurant = 6103,
    /// Customization option not offered by the menu item
    CustomizationNotFound = 6104,
    /// Category not found
    CategoryNotFound = 6201,
    /// Category name already exists
    CategoryNameExists = 6202,
    /// Category is referenced by menu items
    CategoryInUse = 6203,

    // ==================== 7xxx: Review ====================
    /// Review not found
    ReviewNotFound = 7001,
    /// Order was already reviewed by this user
    ReviewExists = 7002,
    /// Only delivered orders can be reviewed
    OrderNotDelivered = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default human-readable message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Not authorized to access this route",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "User role is not authorized to access this route",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::NotResourceOwner => "Not authorized to modify this resource",
            ErrorCode::CannotRegisterAdmin => "Admin accounts cannot be self-registered",
            ErrorCode::CannotDeleteSelf => "Cannot delete own account",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailExists => "Email is already registered",
            ErrorCode::InvalidResetToken => "Invalid or expired reset token",
            ErrorCode::InvalidVerificationToken => "Invalid verification token",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::InvalidStatusTransition => "Invalid order status transition",
            ErrorCode::OrderNotEditable => "Order can no longer be modified",
            ErrorCode::BelowMinimumOrder => "Order subtotal is below the minimum order amount",
            ErrorCode::PriceChanged => "Menu prices have changed, please review your cart",
            ErrorCode::ConcurrentModification => "Order was modified by another request",
            ErrorCode::DeliveryPartnerMismatch => "Order is assigned to another delivery partner",

            // Payment
            ErrorCode::InvalidPaymentTransition => "Invalid payment status transition",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",

            // Catalog
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantInactive => "Restaurant is not accepting orders",
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemUnavailable => "Menu item is not available",
            ErrorCode::MenuItemWrongRestaurant => "Menu item does not belong to this restaurant",
            ErrorCode::CustomizationNotFound => "Customization option not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::CategoryInUse => "Category has associated menu items",

            // Review
            ErrorCode::ReviewNotFound => "Review not found",
            ErrorCode::ReviewExists => "You have already reviewed this order",
            ErrorCode::OrderNotDelivered => "Only delivered orders can be reviewed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::NotResourceOwner),
            2005 => Ok(ErrorCode::CannotRegisterAdmin),
            2006 => Ok(ErrorCode::CannotDeleteSelf),

            // Account
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::EmailExists),
            3003 => Ok(ErrorCode::InvalidResetToken),
            3004 => Ok(ErrorCode::InvalidVerificationToken),
            3005 => Ok(ErrorCode::PasswordTooShort),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::InvalidStatusTransition),
            4004 => Ok(ErrorCode::OrderNotEditable),
            4005 => Ok(ErrorCode::BelowMinimumOrder),
            4006 => Ok(ErrorCode::PriceChanged),
            4007 => Ok(ErrorCode::ConcurrentModification),
            4008 => Ok(ErrorCode::DeliveryPartnerMismatch),

            // Payment
            5001 => Ok(ErrorCode::InvalidPaymentTransition),
            5002 => Ok(ErrorCode::PaymentInvalidMethod),

            // Catalog
            6001 => Ok(ErrorCode::RestaurantNotFound),
            6002 => Ok(ErrorCode::RestaurantInactive),
            6101 => Ok(ErrorCode::MenuItemNotFound),
            6102 => Ok(ErrorCode::MenuItemUnavailable),
            6103 => Ok(ErrorCode::MenuItemWrongRestaurant),
            6104 => Ok(ErrorCode::CustomizationNotFound),
            6201 => Ok(ErrorCode::CategoryNotFound),
            6202 => Ok(ErrorCode::CategoryNameExists),
            6203 => Ok(ErrorCode::CategoryInUse),

            // Review
            7001 => Ok(ErrorCode::ReviewNotFound),
            7002 => Ok(ErrorCode::ReviewExists),
            7003 => Ok(ErrorCode::OrderNotDelivered),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::EmailExists.code(), 3002);
        assert_eq!(ErrorCode::InvalidStatusTransition.code(), 4003);
        assert_eq!(ErrorCode::InvalidPaymentTransition.code(), 5001);
        assert_eq!(ErrorCode::MenuItemNotFound.code(), 6101);
        assert_eq!(ErrorCode::ReviewExists.code(), 7002);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_roundtrip_known_codes() {
        for code in [
            ErrorCode::Success,
            ErrorCode::TokenExpired,
            ErrorCode::NotResourceOwner,
            ErrorCode::InvalidResetToken,
            ErrorCode::ConcurrentModification,
            ErrorCode::CategoryInUse,
            ErrorCode::OrderNotDelivered,
            ErrorCode::ConfigError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_unknown_code() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(
            InvalidErrorCode(4242).to_string(),
            "invalid error code: 4242"
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::ReviewExists).unwrap();
        assert_eq!(json, "7002");
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);
    }

    #[test]
    fn test_display_is_numeric() {
        assert_eq!(ErrorCode::OrderEmpty.to_string(), "4002");
    }
}
