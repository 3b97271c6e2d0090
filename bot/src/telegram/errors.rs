use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("telegram api error: {0}")]
    Api(String),
}
