//! SQLite persistence for establishments and prices.

pub mod establishments;
pub mod prices;
