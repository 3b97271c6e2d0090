pub mod cli;
pub mod config;
pub mod console;
pub mod render;
pub mod router;
pub mod telegram;
