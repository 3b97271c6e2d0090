//! Content side of the bot: what a session delivers and where it comes from.
//!
//! The scheduler only sees the [`ContentSupplier`] trait and the
//! [`ContentUnit`] it yields. The OpenAI adapter and the offline
//! [`CannedSupplier`] are the two concrete suppliers.

pub mod openai;
pub mod prompt;
pub mod supplier;
pub mod topics;
pub mod types;

pub use supplier::{CannedSupplier, ContentSupplier, SupplyError};
pub use topics::TopicPicker;
pub use types::{ContentKind, ContentUnit};
