use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/gaming", get(handlers::get_gaming))
        .route("/api/gaming/packages/:id/sale", post(handlers::record_sale))
        .route("/api/gaming/packages/:id/price", put(handlers::edit_price))
        .route("/api/gaming/members", post(handlers::add_member))
        .route("/api/gaming/members/:id/payment", post(handlers::mark_payment))
        .route("/api/snack", get(handlers::get_snack))
        .route("/api/snack/sales", post(handlers::record_daily_sale))
        .route("/api/snack/customers", post(handlers::add_customer))
        .route(
            "/api/snack/customers/:id/payment",
            post(handlers::mark_customer_paid),
        )
        .route("/api/snack/price", put(handlers::update_price))
        .route("/api/snack/history", get(handlers::get_history))
        .with_state(state)
}
