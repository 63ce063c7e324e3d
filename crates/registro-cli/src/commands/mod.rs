pub mod establishments;
pub mod prices;
pub mod submit;
