use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion response had no message content")]
    NoChoices,
}
