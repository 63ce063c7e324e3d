mod establishment;
mod price;

pub use establishment::*;
pub use price::*;
