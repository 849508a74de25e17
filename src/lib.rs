pub mod api;
pub mod calculos;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod utils;

pub use api::AppState;
pub use config::Config;
pub use db::{Database, SesionState};
