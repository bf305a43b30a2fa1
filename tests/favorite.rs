mod common;

use std::sync::Arc;

use assert_matches::assert_matches;

use geonode_catalog_client::actions::Action;
use geonode_catalog_client::domain::{Resource, ResourcePatch, SearchParams};
use geonode_catalog_client::effects::StateHandle;
use geonode_catalog_client::effects::favorite::handle_favorite_toggle;
use geonode_catalog_client::error::{CANNOT_PERFORM_ACTION, CatalogError, DEFAULT_ERROR_MESSAGE};
use geonode_catalog_client::{AppState, Store};

use common::{MemorySink, MockCatalog, kinds, recorder, rivers};

fn pks(state: &AppState) -> Vec<&str> {
    state
        .gnsearch
        .resources
        .iter()
        .map(|resource| resource.pk.as_str())
        .collect()
}

fn favorites_listing(resources: Vec<Resource>, viewed: Resource) -> AppState {
    let mut state = AppState::default();
    state.gnsearch.params = SearchParams::new().with("f", "favorite");
    state.gnsearch.total = resources.len() as i64;
    state.gnsearch.resources = resources;
    state.gnresource.data = Some(viewed);
    state
}

#[test]
fn failed_toggle_rolls_back() {
    let catalog = Arc::new(MockCatalog {
        favorite_error: Some((500, None)),
        ..MockCatalog::default()
    });
    let mut initial = AppState::default();
    initial.gnresource.data = Some(rivers());
    let mut store = Store::new(initial, Arc::clone(&catalog), Arc::new(MemorySink::default()));

    let state = store
        .dispatch_and_wait(Action::SetFavoriteResource { favorite: true })
        .unwrap();

    assert_eq!(state.gnresource.data.as_ref().map(|r| r.favorite), Some(false));
    let errors: Vec<_> = state.notifications.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].title, CANNOT_PERFORM_ACTION);
    assert_eq!(errors[0].message, DEFAULT_ERROR_MESSAGE);
    assert_eq!(catalog.calls(), vec!["POST 1/favorite".to_string()]);
}

#[test]
fn optimistic_update_precedes_request() {
    let catalog = MockCatalog {
        favorite_error: Some((403, Some("You do not have permission".to_string()))),
        ..MockCatalog::default()
    };
    let mut initial = AppState::default();
    initial.gnresource.data = Some(rivers());
    let state = StateHandle::new(initial);
    let (out, log) = recorder();

    handle_favorite_toggle(&catalog, true, &state, &out).unwrap();

    let actions = log.lock().unwrap();
    assert_eq!(
        kinds(&actions),
        vec![
            "update_resource_properties",
            "update_resource_properties",
            "show_notification"
        ]
    );
    assert_eq!(
        actions[0],
        Action::UpdateResourceProperties {
            patch: ResourcePatch::favorite(true)
        }
    );
    assert_eq!(
        actions[1],
        Action::UpdateResourceProperties {
            patch: ResourcePatch::favorite(false)
        }
    );
    assert_matches!(
        &actions[2],
        Action::ShowNotification { notification }
            if notification.message == "You do not have permission"
    );
}

#[test]
fn unfavorite_removes_from_favorites_listing() {
    let mut viewed = rivers();
    viewed.favorite = true;
    let other = Resource::new(2u64, "Roads");
    let initial = favorites_listing(vec![viewed.clone(), other], viewed);
    let catalog = Arc::new(MockCatalog::default());
    let mut store = Store::new(initial, Arc::clone(&catalog), Arc::new(MemorySink::default()));

    let state = store
        .dispatch_and_wait(Action::SetFavoriteResource { favorite: false })
        .unwrap();

    assert_eq!(pks(&state), vec!["2"]);
    assert_eq!(state.gnsearch.total, 1);
    assert_eq!(state.gnresource.data.as_ref().map(|r| r.favorite), Some(false));
    assert_eq!(catalog.calls(), vec!["DELETE 1/favorite".to_string()]);
}

#[test]
fn favorite_appends_to_favorites_listing() {
    let initial = favorites_listing(vec![Resource::new(2u64, "Roads")], rivers());
    let mut store = Store::new(
        initial,
        Arc::new(MockCatalog::default()),
        Arc::new(MemorySink::default()),
    );

    let state = store
        .dispatch_and_wait(Action::SetFavoriteResource { favorite: true })
        .unwrap();

    assert_eq!(pks(&state), vec!["2", "1"]);
    assert!(state.gnsearch.resources[1].favorite);
    assert_eq!(state.gnsearch.total, 2);
    assert!(state.notifications.items.is_empty());
}

#[test]
fn regular_listing_is_left_in_place() {
    let mut initial = AppState::default();
    initial.gnsearch.params = SearchParams::new().with("f", "dataset");
    initial.gnsearch.resources = vec![rivers(), Resource::new(2u64, "Roads")];
    initial.gnsearch.total = 2;
    initial.gnresource.data = Some(rivers());
    let state = StateHandle::new(initial);
    let (out, log) = recorder();

    handle_favorite_toggle(&MockCatalog::default(), true, &state, &out).unwrap();

    let actions = log.lock().unwrap();
    assert_eq!(
        kinds(&actions),
        vec!["update_resource_properties", "update_resources"]
    );
    assert_matches!(
        &actions[1],
        Action::UpdateResources { resources, reset: true } if resources.len() == 2
    );
}

#[test]
fn toggle_without_viewed_resource_fails() {
    let (out, log) = recorder();
    let err = handle_favorite_toggle(
        &MockCatalog::default(),
        true,
        &StateHandle::new(AppState::default()),
        &out,
    )
    .unwrap_err();

    assert_matches!(err, CatalogError::MissingResource);
    assert!(log.lock().unwrap().is_empty());
}
