use crate::actions::{Action, FeaturedDirection, FeaturedPatch, ResourcesMetadata};
use crate::api::CatalogClient;
use crate::domain::{ResourcePk, ResourceQuery, SearchParams};
use crate::effects::{Dispatcher, StateHandle};
use crate::error::CatalogError;
use crate::search::{FeaturedResources, SearchState};

/// Page to request and whether the result replaces the current list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub page: u32,
    pub reset: bool,
}

/// Infinite-scroll mode only appends when the requested page directly
/// follows the pages already loaded with unchanged filters.
pub fn plan_page(search: &SearchState, next: &SearchParams, reset: bool) -> PagePlan {
    let requested = next.page().unwrap_or(1);
    let previous = search.params.page().unwrap_or(1);
    let filters_changed = search.params.cleaned().without("page") != next.cleaned().without("page");

    if search.config.pagination {
        let page = if !search.is_first_request && filters_changed {
            1
        } else {
            requested
        };
        return PagePlan { page, reset: true };
    }

    let is_next_page = requested == previous + 1 && requested == search.loaded_pages() + 1;
    let reset = reset || search.is_first_request || filters_changed || !is_next_page;
    PagePlan {
        page: if reset { 1 } else { requested },
        reset,
    }
}

pub fn handle_search_resources<C>(
    client: &C,
    params: &SearchParams,
    reset: bool,
    state: &StateHandle,
    out: &Dispatcher,
) -> Result<(), CatalogError>
where
    C: CatalogClient + ?Sized,
{
    let search = state.snapshot().gnsearch;
    let cleaned = params.cleaned();
    let plan = plan_page(&search, &cleaned, reset);

    let mut request_params = cleaned.without("page");
    request_params.set("page", plan.page.to_string());
    let mut query_params = request_params.clone();
    for (key, value) in search.config.default_query.iter() {
        query_params.replace(key, value.clone());
    }
    let query = ResourceQuery {
        params: query_params.cleaned(),
        page: plan.page,
        page_size: search.config.page_size,
    };

    out.emit(Action::LoadingResources { loading: true });
    match client.get_resources(&query) {
        Ok(page) => {
            tracing::debug!(
                page = plan.page,
                reset = plan.reset,
                count = page.resources.len(),
                total = page.total,
                "resources loaded"
            );
            out.emit(Action::UpdateResources {
                resources: page.resources,
                reset: plan.reset,
            });
            out.emit(Action::UpdateResourcesMetadata {
                metadata: ResourcesMetadata {
                    total: Some(page.total),
                    is_next_page_available: Some(page.is_next_page_available),
                    params: Some(request_params),
                    ..ResourcesMetadata::default()
                },
            });
        }
        Err(err) => {
            tracing::warn!(error = %err, "resource search failed");
            out.emit(Action::UpdateResources {
                resources: Vec::new(),
                reset: true,
            });
            out.emit(Action::UpdateResourcesMetadata {
                metadata: ResourcesMetadata {
                    total: Some(0),
                    is_next_page_available: Some(false),
                    error: Some(true),
                    params: Some(request_params),
                    ..ResourcesMetadata::default()
                },
            });
        }
    }
    out.emit(Action::LoadingResources { loading: false });
    Ok(())
}

/// Opens a resource in the detail view, showing the copy from the result
/// list while the full record loads.
pub fn handle_request_resource<C>(
    client: &C,
    pk: Option<&ResourcePk>,
    state: &StateHandle,
    out: &Dispatcher,
) -> Result<(), CatalogError>
where
    C: CatalogClient + ?Sized,
{
    let Some(pk) = pk else {
        out.emit(Action::SetResource { resource: None });
        return Ok(());
    };

    let preloaded = state
        .snapshot()
        .gnsearch
        .resources
        .into_iter()
        .find(|item| &item.pk == pk);
    match preloaded {
        Some(resource) => out.emit(Action::SetResource {
            resource: Some(resource),
        }),
        None => out.emit(Action::ResourceLoading),
    }

    match client.get_resource(pk) {
        Ok(resource) => out.emit(Action::SetResource {
            resource: Some(resource),
        }),
        Err(err) => {
            tracing::warn!(pk = %pk, error = %err, "resource request failed");
            out.emit(Action::ResourceError {
                message: err.notification_message(),
            });
        }
    }
    Ok(())
}

pub fn handle_get_facet_items<C>(client: &C, out: &Dispatcher) -> Result<(), CatalogError>
where
    C: CatalogClient + ?Sized,
{
    let items = client.get_facet_items().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "facet items unavailable");
        Vec::new()
    });
    out.emit(Action::SetFacetItems { items });
    Ok(())
}

/// Page the carousel moves to. A blocked `Next` falls back to the previous
/// page, or to the first one.
pub fn featured_page(featured: &FeaturedResources, direction: Option<FeaturedDirection>) -> u32 {
    let Some(direction) = direction else {
        return 1;
    };
    let current = featured.page.unwrap_or(1).max(1);
    if direction == FeaturedDirection::Next && featured.is_next_page_available {
        return current + 1;
    }
    if featured.is_previous_page_available {
        (current - 1).max(1)
    } else {
        1
    }
}

pub fn handle_update_featured_resources<C>(
    client: &C,
    direction: Option<FeaturedDirection>,
    page_size: u32,
    state: &StateHandle,
    out: &Dispatcher,
) -> Result<(), CatalogError>
where
    C: CatalogClient + ?Sized,
{
    let page = featured_page(&state.snapshot().gnsearch.featured_resources, direction);
    out.emit(Action::SetFeaturedResources {
        featured: FeaturedPatch {
            loading: Some(true),
            ..FeaturedPatch::default()
        },
    });
    match client.get_featured_resources(page, page_size) {
        Ok(featured) => {
            tracing::debug!(
                page = featured.page,
                count = featured.resources.len(),
                "featured resources loaded"
            );
            out.emit(Action::SetFeaturedResources {
                featured: FeaturedPatch {
                    resources: Some(featured.resources),
                    page: Some(featured.page),
                    is_next_page_available: Some(featured.is_next_page_available),
                    is_previous_page_available: Some(featured.is_previous_page_available),
                    loading: Some(false),
                },
            });
        }
        Err(err) => {
            tracing::warn!(page, error = %err, "featured resources unavailable");
            out.emit(Action::ResourceError {
                message: err.notification_message(),
            });
            out.emit(Action::SetFeaturedResources {
                featured: FeaturedPatch {
                    loading: Some(false),
                    ..FeaturedPatch::default()
                },
            });
        }
    }
    Ok(())
}
