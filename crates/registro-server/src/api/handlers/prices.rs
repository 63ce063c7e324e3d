use std::sync::Arc;

use axum::extract::{Path, State};

use crate::api::extract::Json;
use crate::domain::{Price, UpdatePriceRequest};
use crate::error::{AppError, Result};
use crate::store;
use crate::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Price>>> {
    let prices = store::prices::list(&state.db).await?;
    Ok(Json(prices))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<UpdatePriceRequest>,
) -> Result<Json<Price>> {
    if req.value < 0 {
        return Err(AppError::BadRequest("price value must not be negative".into()));
    }

    let price = if state.config.strict_prices {
        store::prices::update(&state.db, &name, req.value).await?
    } else {
        store::prices::upsert(&state.db, &name, req.value).await?
    };

    Ok(Json(price))
}
