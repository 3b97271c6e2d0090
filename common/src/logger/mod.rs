mod init;
mod spans;

pub use init::init_logger;
pub use spans::{command_span, session_span, warn_if_slow};
