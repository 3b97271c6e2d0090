use content::ContentKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("{kind} interval must be greater than zero")]
    ZeroInterval { kind: ContentKind },

    #[error("{kind} deadline must be greater than zero")]
    ZeroDeadline { kind: ContentKind },

    #[error("retry policy needs at least one attempt")]
    NoAttempts,
}
