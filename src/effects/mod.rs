//! Effect handlers: one intent action in, zero or more follow-up actions
//! out. Handlers read a state snapshot, perform blocking I/O and report
//! through a [`Dispatcher`]. They never touch state directly.

pub mod download;
pub mod favorite;
pub mod search;

use std::sync::{Arc, PoisonError, RwLock};

use crate::actions::Action;
use crate::api::CatalogClient;
use crate::error::CatalogError;
use crate::save::FileSaveSink;
use crate::state::AppState;

/// Shared, read-mostly view of the application state. Only the runtime
/// loop writes through it.
#[derive(Debug, Clone, Default)]
pub struct StateHandle(Arc<RwLock<AppState>>);

impl StateHandle {
    pub fn new(state: AppState) -> Self {
        Self(Arc::new(RwLock::new(state)))
    }

    pub fn snapshot(&self) -> AppState {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn update<F>(&self, f: F)
    where
        F: FnOnce(AppState) -> AppState,
    {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        let current = std::mem::take(&mut *guard);
        *guard = f(current);
    }
}

/// Output port of an effect handler.
#[derive(Clone)]
pub struct Dispatcher {
    emit: Arc<dyn Fn(Action) + Send + Sync>,
}

impl Dispatcher {
    pub fn new<F>(emit: F) -> Self
    where
        F: Fn(Action) + Send + Sync + 'static,
    {
        Self {
            emit: Arc::new(emit),
        }
    }

    pub fn emit(&self, action: Action) {
        (self.emit)(action);
    }
}

pub struct Effects<C: CatalogClient, S: FileSaveSink> {
    client: C,
    saver: S,
}

impl<C: CatalogClient, S: FileSaveSink> Effects<C, S> {
    pub fn new(client: C, saver: S) -> Self {
        Self { client, saver }
    }

    pub fn handles(action: &Action) -> bool {
        matches!(
            action,
            Action::DownloadMetadata { .. }
                | Action::SetFavoriteResource { .. }
                | Action::SearchResources { .. }
                | Action::RequestResource { .. }
                | Action::GetFacetItems
                | Action::UpdateFeaturedResources { .. }
        )
    }

    /// Runs the handler for `action`. An `Err` is a configuration error;
    /// request failures are reported as actions instead.
    pub fn run(
        &self,
        action: &Action,
        state: &StateHandle,
        out: &Dispatcher,
    ) -> Result<(), CatalogError> {
        match action {
            Action::DownloadMetadata { link, pk } => download::handle_download_metadata(
                &self.client,
                &self.saver,
                link,
                pk,
                state,
                out,
            ),
            Action::SetFavoriteResource { favorite } => {
                favorite::handle_favorite_toggle(&self.client, *favorite, state, out)
            }
            Action::SearchResources { params, reset } => {
                search::handle_search_resources(&self.client, params, *reset, state, out)
            }
            Action::RequestResource { pk } => {
                search::handle_request_resource(&self.client, pk.as_ref(), state, out)
            }
            Action::GetFacetItems => search::handle_get_facet_items(&self.client, out),
            Action::UpdateFeaturedResources {
                direction,
                page_size,
            } => search::handle_update_featured_resources(
                &self.client,
                *direction,
                *page_size,
                state,
                out,
            ),
            _ => Ok(()),
        }
    }
}
