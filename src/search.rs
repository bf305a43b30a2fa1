use serde::Serialize;
use serde_json::{Map, Value};

use crate::actions::{Action, FeaturedPatch, SearchConfig};
use crate::domain::{Resource, SearchParams};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub resources: Vec<Resource>,
    pub total: i64,
    pub is_next_page_available: bool,
    pub loading: bool,
    pub error: bool,
    pub params: SearchParams,
    pub previous_params: SearchParams,
    pub next_params: Option<SearchParams>,
    pub is_first_request: bool,
    pub location_search: Option<String>,
    pub location_pathname: Option<String>,
    pub facet_items: Vec<Value>,
    pub filters: Map<String, Value>,
    pub featured_resources: FeaturedResources,
    pub config: SearchConfig,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            total: 0,
            is_next_page_available: false,
            loading: false,
            error: false,
            params: SearchParams::default(),
            previous_params: SearchParams::default(),
            next_params: None,
            is_first_request: true,
            location_search: None,
            location_pathname: None,
            facet_items: Vec::new(),
            filters: Map::new(),
            featured_resources: FeaturedResources::default(),
            config: SearchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedResources {
    pub resources: Vec<Resource>,
    pub page: Option<u32>,
    pub is_next_page_available: bool,
    pub is_previous_page_available: bool,
    pub loading: bool,
}

impl FeaturedResources {
    fn merge(&mut self, patch: &FeaturedPatch) {
        if let Some(resources) = &patch.resources {
            self.resources = resources.clone();
        }
        if let Some(page) = patch.page {
            self.page = Some(page);
        }
        if let Some(value) = patch.is_next_page_available {
            self.is_next_page_available = value;
        }
        if let Some(value) = patch.is_previous_page_available {
            self.is_previous_page_available = value;
        }
        if let Some(loading) = patch.loading {
            self.loading = loading;
        }
    }
}

impl SearchState {
    /// Number of full pages currently held in the result list.
    pub fn loaded_pages(&self) -> u32 {
        let page_size = self.config.page_size.max(1) as usize;
        (self.resources.len() / page_size) as u32
    }

    pub fn reduce(mut self, action: &Action) -> Self {
        match action {
            Action::SearchResources { params, .. } => {
                self.next_params = Some(params.clone());
            }
            Action::UpdateResources { resources, reset } => {
                self.is_first_request = false;
                if *reset {
                    self.resources = resources.clone();
                } else {
                    self.resources.extend(resources.iter().cloned());
                }
            }
            Action::UpdateSingleResource { resource } => {
                self.is_first_request = false;
                if let Some(slot) = self
                    .resources
                    .iter_mut()
                    .find(|item| item.pk == resource.pk)
                {
                    *slot = resource.clone();
                }
            }
            Action::UpdateResourcesMetadata { metadata } => {
                if let Some(total) = metadata.total {
                    self.total = total;
                }
                if let Some(available) = metadata.is_next_page_available {
                    self.is_next_page_available = available;
                }
                if let Some(error) = metadata.error {
                    self.error = error;
                }
                if let Some(params) = &metadata.params {
                    self.previous_params = std::mem::replace(&mut self.params, params.clone());
                    self.next_params = None;
                }
                if let Some(search) = &metadata.location_search {
                    self.location_search = Some(search.clone());
                }
                if let Some(pathname) = &metadata.location_pathname {
                    self.location_pathname = Some(pathname.clone());
                }
            }
            Action::LoadingResources { loading } => {
                self.loading = *loading;
                if *loading {
                    self.error = false;
                }
            }
            Action::ReduceTotalCount => self.total -= 1,
            Action::IncreaseTotalCount => self.total += 1,
            Action::SetSearchConfig { config } => self.config = config.clone(),
            Action::SetFacetItems { items } => self.facet_items = items.clone(),
            Action::SetFilters { filters } => {
                for (key, value) in filters {
                    self.filters.insert(key.clone(), value.clone());
                }
            }
            Action::SetFeaturedResources { featured } => self.featured_resources.merge(featured),
            _ => {}
        }
        self
    }
}
