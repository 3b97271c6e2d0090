pub mod model;
pub mod registry;

pub use model::{Session, SessionId, SessionKey, SessionState, SessionTiming};
pub use registry::SessionRegistry;
