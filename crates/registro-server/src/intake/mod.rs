//! Webhook intake: payload extraction, field mapping and the ingestion
//! pipeline that turns a submission into a registered establishment.

mod mapping;
mod payload;
mod pipeline;

pub use mapping::*;
pub use payload::*;
pub use pipeline::*;
