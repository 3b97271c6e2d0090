pub mod engine;
pub mod error;
pub mod progress;
pub mod retry;
pub mod types;

pub use engine::SessionScheduler;
pub use error::SchedulerError;
pub use progress::{SessionProgress, session_progress};
pub use retry::{RetryFetcher, RetryPolicy};
pub use types::{
    DeliveryError, DeliverySink, SchedulerConfig, SessionNotice, StartOutcome, StopOutcome,
};
