pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::http::{create_router, AppState};
pub use config::ServiceConfig;
pub use core::fallback::{FallbackClient, FallbackSettings};
pub use core::{FallbackPolicy, StatusRange, UsersService};
pub use utils::error::{Result, UsersError};
