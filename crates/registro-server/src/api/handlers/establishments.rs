use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use crate::domain::{EstablishmentFullResponse, EstablishmentResponse, PaymentLinkResponse};
use crate::error::Result;
use crate::store;
use crate::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<EstablishmentResponse>>> {
    let establishments = store::establishments::list(&state.db).await?;
    Ok(Json(establishments.into_iter().map(Into::into).collect()))
}

pub async fn list_full(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EstablishmentFullResponse>>> {
    let establishments = store::establishments::list(&state.db).await?;
    Ok(Json(establishments.into_iter().map(Into::into).collect()))
}

pub async fn generate_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PaymentLinkResponse>> {
    let establishment = store::establishments::find(&state.db, id).await?;
    let quote = state.prices.current(&state.config.price_name).await;

    let payment_link = state
        .payments
        .create_payment_link(&establishment, quote.value)
        .await?;

    store::establishments::attach_payment_link(&state.db, id, &payment_link).await?;
    info!(establishment_id = id, price = quote.value, source = ?quote.source, "payment link attached");

    Ok(Json(PaymentLinkResponse { payment_link }))
}
