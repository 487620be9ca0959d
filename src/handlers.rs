use crate::errors::{AppError, StoreError};
use crate::models::{
    ChartPoint, CrewSubscription, DailySaleRequest, DailySalesRecord, DebtCustomer, GamingPackage,
    GamingView, HistoryQuery, MutationResponse, NewCustomerRequest, NewMemberRequest,
    PaymentRequest, PriceRequest, PriceSetting, SnackView,
};
use crate::session::Session;
use crate::state::AppState;
use crate::stats::{HISTORY_DAYS, build_gaming_view, build_snack_view, recent_history};
use crate::validation;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;

pub async fn get_gaming(State(state): State<AppState>) -> Json<GamingView> {
    let session = state.session.lock().await;
    Json(build_gaming_view(session.gaming(), Utc::now()))
}

pub async fn record_sale(
    State(state): State<AppState>,
    Path(package_id): Path<String>,
) -> Result<Json<MutationResponse<GamingPackage>>, AppError> {
    let package = mutate(&state, move |session| session.record_sale(&package_id)).await?;
    Ok(Json(package.into()))
}

pub async fn edit_price(
    State(state): State<AppState>,
    Path(package_id): Path<String>,
    Json(payload): Json<PriceRequest>,
) -> Result<Json<MutationResponse<GamingPackage>>, AppError> {
    let price = validation::price(payload.price.as_ref())?;
    let package = mutate(&state, move |session| session.edit_price(&package_id, price)).await?;
    Ok(Json(package.into()))
}

pub async fn add_member(
    State(state): State<AppState>,
    Json(payload): Json<NewMemberRequest>,
) -> Result<Json<MutationResponse<CrewSubscription>>, AppError> {
    let member = validation::new_member(&payload)?;
    let subscription = mutate(&state, move |session| {
        session.add_member(Utc::now(), member)
    })
    .await?;
    Ok(Json(subscription.into()))
}

pub async fn mark_payment(
    State(state): State<AppState>,
    Path(subscription_id): Path<String>,
    Json(payload): Json<PaymentRequest>,
) -> Result<Json<MutationResponse<CrewSubscription>>, AppError> {
    let subscription = mutate(&state, move |session| {
        session.mark_payment(Utc::now(), &subscription_id, payload.paid)
    })
    .await?;
    Ok(Json(subscription.into()))
}

pub async fn get_snack(State(state): State<AppState>) -> Json<SnackView> {
    let session = state.session.lock().await;
    Json(build_snack_view(session.snack()))
}

pub async fn record_daily_sale(
    State(state): State<AppState>,
    Json(payload): Json<DailySaleRequest>,
) -> Result<Json<MutationResponse<DailySalesRecord>>, AppError> {
    let entry = validation::sale_entry(&payload)?;
    let record = mutate(&state, move |session| {
        session.record_daily_sale(Utc::now(), entry)
    })
    .await?;
    Ok(Json(record.into()))
}

pub async fn add_customer(
    State(state): State<AppState>,
    Json(payload): Json<NewCustomerRequest>,
) -> Result<Json<MutationResponse<DebtCustomer>>, AppError> {
    let customer = validation::new_customer(&payload)?;
    let customer = mutate(&state, move |session| {
        session.add_customer(Utc::now(), customer)
    })
    .await?;
    Ok(Json(customer.into()))
}

pub async fn mark_customer_paid(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(payload): Json<PaymentRequest>,
) -> Result<Json<MutationResponse<DebtCustomer>>, AppError> {
    let customer = mutate(&state, move |session| {
        session.mark_customer_paid(&customer_id, payload.paid)
    })
    .await?;
    Ok(Json(customer.into()))
}

pub async fn update_price(
    State(state): State<AppState>,
    Json(payload): Json<PriceRequest>,
) -> Result<Json<PriceSetting>, AppError> {
    let price = validation::price(payload.price.as_ref())?;
    let setting = mutate(&state, move |session| session.update_price(Utc::now(), price)).await?;
    Ok(Json(setting))
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<ChartPoint>> {
    let days = query.days.unwrap_or(HISTORY_DAYS);
    let session = state.session.lock().await;
    Json(recent_history(session.snack().daily_sales(), days))
}

// Session mutations end in a blocking file write, so they run on the
// blocking pool while holding the session lock.
async fn mutate<T, F>(state: &AppState, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&mut Session) -> Result<T, StoreError> + Send + 'static,
{
    let mut session = state.session.clone().lock_owned().await;
    let result = tokio::task::spawn_blocking(move || op(&mut *session))
        .await
        .map_err(AppError::internal)?;
    Ok(result?)
}
