pub mod dashboard;
pub mod establishments;
pub mod health;
pub mod prices;
pub mod webhook;
