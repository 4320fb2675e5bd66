//! Account Routes

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Build account router
/// - register / login / forgotpassword / resetpassword / verify: public
/// - me / updatedetails / updatepassword: authenticated by the global `require_auth`
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
        .route("/updatedetails", put(handler::update_details))
        .route("/updatepassword", put(handler::update_password))
        .route("/forgotpassword", post(handler::forgot_password))
        .route("/resetpassword/{token}", put(handler::reset_password))
        .route("/verify/{token}", get(handler::verify_email))
}
