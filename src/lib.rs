pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod resources;
pub mod services;
pub mod store;
pub mod types;

pub use app::{app, AppState};
