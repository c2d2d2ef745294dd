pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use core::{
    dashboard::Dashboard,
    engine::{DashboardEngine, Selection},
    resolver::normalize,
    scheduler::Animator,
    store::DataStore,
    timeline::Timeline,
};
pub use utils::error::{DashError, Result};
