//! Payment collaborators: the price lookup and the Mercado Pago checkout
//! preference used as an establishment's payment link.

mod mercadopago;
mod pricing;

pub use mercadopago::*;
pub use pricing::*;
