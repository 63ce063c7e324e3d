use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named price in minor currency units (cents).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Price {
    pub id: i64,
    pub name: String,
    pub value: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePriceRequest {
    pub value: i64,
}
