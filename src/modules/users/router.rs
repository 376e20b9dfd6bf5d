use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::users::controller::{login, logout, me, refresh, register};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/me", get(me))
}
