pub mod actions;
pub mod api;
pub mod config;
pub mod domain;
pub mod download;
pub mod effects;
pub mod error;
pub mod notifications;
pub mod output;
pub mod resource;
pub mod runtime;
pub mod save;
pub mod search;
pub mod state;

pub use actions::Action;
pub use error::CatalogError;
pub use runtime::Store;
pub use state::AppState;

use crate::config::ClientConfig;
use crate::download::DownloadState;

/// Initial state seeded from configuration: known metadata formats get an
/// empty in-flight map, search paging follows the configured page size.
pub fn initial_state(config: &ClientConfig) -> AppState {
    let mut state = AppState {
        gndownload: DownloadState::with_formats(&config.metadata_formats),
        ..AppState::default()
    };
    state.gnsearch.config = config.search.clone();
    state
}
