mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;

use geonode_catalog_client::actions::{Action, FeaturedDirection};
use geonode_catalog_client::domain::{
    FeaturedPage, Resource, ResourcePage, ResourcePk, SearchParams,
};
use geonode_catalog_client::effects::StateHandle;
use geonode_catalog_client::effects::search::{
    handle_request_resource, handle_update_featured_resources,
};
use geonode_catalog_client::{AppState, Store};

use common::{MemorySink, MockCatalog, kinds, recorder, rivers};

fn two_per_page() -> AppState {
    let mut state = AppState::default();
    state.gnsearch.config.page_size = 2;
    state
}

fn page_of(pks: &[u64], total: i64) -> ResourcePage {
    ResourcePage {
        resources: pks
            .iter()
            .map(|pk| Resource::new(*pk, format!("resource {pk}")))
            .collect(),
        total,
        is_next_page_available: true,
    }
}

fn roads(page: u32) -> SearchParams {
    SearchParams::new()
        .with("q", "roads")
        .with("page", page.to_string())
}

#[test]
fn next_page_is_appended() {
    let catalog = Arc::new(MockCatalog {
        page: Some(page_of(&[1, 2], 5)),
        ..MockCatalog::default()
    });
    let mut store = Store::new(two_per_page(), Arc::clone(&catalog), Arc::new(MemorySink::default()));

    let first = store
        .dispatch_and_wait(Action::SearchResources {
            params: roads(1),
            reset: false,
        })
        .unwrap();
    assert_eq!(first.gnsearch.resources.len(), 2);
    assert_eq!(first.gnsearch.total, 5);
    assert!(first.gnsearch.is_next_page_available);
    assert!(!first.gnsearch.loading);
    assert!(!first.gnsearch.is_first_request);
    assert_eq!(first.gnsearch.params, roads(1));

    let second = store
        .dispatch_and_wait(Action::SearchResources {
            params: roads(2),
            reset: false,
        })
        .unwrap();
    assert_eq!(second.gnsearch.resources.len(), 4);
    assert_eq!(second.gnsearch.params, roads(2));
    assert_eq!(second.gnsearch.previous_params, roads(1));
    assert_eq!(second.gnsearch.next_params, None);
    assert_eq!(
        catalog.calls(),
        vec![
            "GET resources page=1".to_string(),
            "GET resources page=2".to_string()
        ]
    );
}

#[test]
fn changed_query_replaces_results() {
    let catalog = Arc::new(MockCatalog {
        page: Some(page_of(&[1, 2], 2)),
        ..MockCatalog::default()
    });
    let mut store = Store::new(two_per_page(), Arc::clone(&catalog), Arc::new(MemorySink::default()));
    store
        .dispatch_and_wait(Action::SearchResources {
            params: roads(1),
            reset: false,
        })
        .unwrap();

    let params = SearchParams::new().with("q", "rivers").with("page", "2");
    let state = store
        .dispatch_and_wait(Action::SearchResources {
            params,
            reset: false,
        })
        .unwrap();

    assert_eq!(state.gnsearch.resources.len(), 2);
    assert_eq!(state.gnsearch.params.values("page"), vec!["1"]);
    assert_eq!(catalog.calls().last().map(String::as_str), Some("GET resources page=1"));
}

#[test]
fn default_query_is_sent_but_not_stored() {
    let catalog = Arc::new(MockCatalog {
        page: Some(page_of(&[1], 1)),
        ..MockCatalog::default()
    });
    let mut initial = two_per_page();
    initial.gnsearch.config.default_query = SearchParams::new().with("sort", "-date");
    let mut store = Store::new(initial, Arc::clone(&catalog), Arc::new(MemorySink::default()));

    let state = store
        .dispatch_and_wait(Action::SearchResources {
            params: roads(1),
            reset: true,
        })
        .unwrap();

    let queries = catalog.queries.lock().unwrap();
    assert_eq!(queries[0].params.values("sort"), vec!["-date"]);
    assert_eq!(queries[0].page_size, 2);
    assert!(state.gnsearch.params.get("sort").is_none());
}

#[test]
fn default_query_wins_over_request_params() {
    let catalog = Arc::new(MockCatalog {
        page: Some(page_of(&[1], 1)),
        ..MockCatalog::default()
    });
    let mut initial = two_per_page();
    initial.gnsearch.config.default_query = SearchParams::new().with("f", "dataset");
    let mut store = Store::new(initial, Arc::clone(&catalog), Arc::new(MemorySink::default()));

    let params = roads(1).with("f", "map").with("f", "document");
    let state = store
        .dispatch_and_wait(Action::SearchResources {
            params,
            reset: true,
        })
        .unwrap();

    let queries = catalog.queries.lock().unwrap();
    assert_eq!(queries[0].params.values("f"), vec!["dataset"]);
    assert_eq!(queries[0].params.values("q"), vec!["roads"]);
    assert_eq!(state.gnsearch.params.values("f"), vec!["map", "document"]);
}

#[test]
fn failed_search_clears_results() {
    let mut initial = two_per_page();
    initial.gnsearch.resources = vec![rivers()];
    initial.gnsearch.total = 1;
    let mut store = Store::new(
        initial,
        Arc::new(MockCatalog::default()),
        Arc::new(MemorySink::default()),
    );

    let state = store
        .dispatch_and_wait(Action::SearchResources {
            params: roads(1),
            reset: true,
        })
        .unwrap();

    assert!(state.gnsearch.error);
    assert!(!state.gnsearch.loading);
    assert!(state.gnsearch.resources.is_empty());
    assert_eq!(state.gnsearch.total, 0);
    assert!(!state.gnsearch.is_next_page_available);
}

#[test]
fn request_resource_shows_listed_copy_first() {
    let mut full = rivers();
    full.title = "Rivers of Europe".to_string();
    let catalog = MockCatalog {
        resource: Some(full.clone()),
        ..MockCatalog::default()
    };
    let mut initial = AppState::default();
    initial.gnsearch.resources = vec![rivers()];
    let state = StateHandle::new(initial);
    let (out, log) = recorder();

    handle_request_resource(&catalog, Some(&ResourcePk::from(1u64)), &state, &out).unwrap();

    let actions = log.lock().unwrap();
    assert_eq!(
        *actions,
        vec![
            Action::SetResource {
                resource: Some(rivers())
            },
            Action::SetResource {
                resource: Some(full)
            },
        ]
    );
}

#[test]
fn request_unknown_resource_reports_error() {
    let mut store = Store::new(
        AppState::default(),
        Arc::new(MockCatalog::default()),
        Arc::new(MemorySink::default()),
    );

    let state = store
        .dispatch_and_wait(Action::RequestResource {
            pk: Some(ResourcePk::from(9u64)),
        })
        .unwrap();

    assert!(!state.gnresource.loading);
    assert!(state.gnresource.data.is_none());
    assert_eq!(state.gnresource.error.as_deref(), Some("Not found."));
}

#[test]
fn request_without_pk_clears_view() {
    let mut initial = AppState::default();
    initial.gnresource.data = Some(rivers());
    let state = StateHandle::new(initial);
    let catalog = MockCatalog::default();
    let (out, log) = recorder();

    handle_request_resource(&catalog, None, &state, &out).unwrap();

    assert_eq!(kinds(&log.lock().unwrap()), vec!["set_resource"]);
    assert_matches!(&log.lock().unwrap()[0], Action::SetResource { resource: None });
    assert!(catalog.calls().is_empty());
}

#[test]
fn facet_items_are_loaded() {
    let mut store = Store::new(
        AppState::default(),
        Arc::new(MockCatalog {
            facets: vec![json!({"name": "category"}), json!({"name": "owner"})],
            ..MockCatalog::default()
        }),
        Arc::new(MemorySink::default()),
    );

    let state = store.dispatch_and_wait(Action::GetFacetItems).unwrap();

    assert_eq!(state.gnsearch.facet_items.len(), 2);
    assert_eq!(state.gnsearch.facet_items[0]["name"], "category");
}

fn featured_page(pks: &[u64], page: u32, next: bool, previous: bool) -> FeaturedPage {
    FeaturedPage {
        resources: pks.iter().map(|pk| Resource::new(*pk, "featured")).collect(),
        page,
        is_next_page_available: next,
        is_previous_page_available: previous,
    }
}

#[test]
fn featured_carousel_moves_to_next_page() {
    let catalog = Arc::new(MockCatalog {
        featured: Some(featured_page(&[5, 6], 3, false, true)),
        ..MockCatalog::default()
    });
    let mut initial = AppState::default();
    initial.gnsearch.featured_resources.page = Some(2);
    initial.gnsearch.featured_resources.is_next_page_available = true;
    let mut store = Store::new(initial, Arc::clone(&catalog), Arc::new(MemorySink::default()));

    let state = store
        .dispatch_and_wait(Action::UpdateFeaturedResources {
            direction: Some(FeaturedDirection::Next),
            page_size: 2,
        })
        .unwrap();

    let featured = &state.gnsearch.featured_resources;
    assert_eq!(catalog.calls(), vec!["GET featured page=3 page_size=2".to_string()]);
    assert_eq!(featured.page, Some(3));
    assert_eq!(featured.resources.len(), 2);
    assert!(!featured.is_next_page_available);
    assert!(featured.is_previous_page_available);
    assert!(!featured.loading);
}

#[test]
fn featured_loading_precedes_result() {
    let catalog = MockCatalog {
        featured: Some(featured_page(&[5], 1, true, false)),
        ..MockCatalog::default()
    };
    let state = StateHandle::new(AppState::default());
    let (out, log) = recorder();

    handle_update_featured_resources(&catalog, None, 4, &state, &out).unwrap();

    let actions = log.lock().unwrap();
    assert_eq!(kinds(&actions), vec!["set_featured_resources", "set_featured_resources"]);
    assert_matches!(
        &actions[0],
        Action::SetFeaturedResources { featured }
            if featured.loading == Some(true) && featured.resources.is_none()
    );
    assert_eq!(catalog.calls(), vec!["GET featured page=1 page_size=4".to_string()]);
}

#[test]
fn featured_failure_reports_resource_error() {
    let mut initial = AppState::default();
    initial.gnsearch.featured_resources.resources = vec![rivers()];
    let mut store = Store::new(
        initial,
        Arc::new(MockCatalog::default()),
        Arc::new(MemorySink::default()),
    );

    let state = store
        .dispatch_and_wait(Action::UpdateFeaturedResources {
            direction: None,
            page_size: 4,
        })
        .unwrap();

    assert!(!state.gnsearch.featured_resources.loading);
    assert_eq!(state.gnsearch.featured_resources.resources.len(), 1);
    assert_eq!(
        state.gnresource.error.as_deref(),
        Some("featured list unavailable")
    );
}
