use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Resource, ResourcePatch, ResourcePk, SearchParams};

/// Every mutation of the client state goes through one of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    DownloadMetadata {
        link: String,
        pk: ResourcePk,
    },
    DownloadMetadataComplete {
        link: String,
        pk: ResourcePk,
    },

    RequestResource {
        pk: Option<ResourcePk>,
    },
    SetResource {
        resource: Option<Resource>,
    },
    ResourceLoading,
    ResourceError {
        message: String,
    },
    UpdateResourceProperties {
        patch: ResourcePatch,
    },
    SetFavoriteResource {
        favorite: bool,
    },

    SearchResources {
        params: SearchParams,
        reset: bool,
    },
    UpdateResources {
        resources: Vec<Resource>,
        reset: bool,
    },
    UpdateSingleResource {
        resource: Resource,
    },
    UpdateResourcesMetadata {
        metadata: ResourcesMetadata,
    },
    LoadingResources {
        loading: bool,
    },
    ReduceTotalCount,
    IncreaseTotalCount,
    SetSearchConfig {
        config: SearchConfig,
    },
    GetFacetItems,
    SetFacetItems {
        items: Vec<Value>,
    },
    SetFilters {
        filters: Map<String, Value>,
    },
    SetFeaturedResources {
        featured: FeaturedPatch,
    },
    UpdateFeaturedResources {
        direction: Option<FeaturedDirection>,
        page_size: u32,
    },

    ShowNotification {
        notification: Notification,
    },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::DownloadMetadata { .. } => "download_metadata",
            Action::DownloadMetadataComplete { .. } => "download_metadata_complete",
            Action::RequestResource { .. } => "request_resource",
            Action::SetResource { .. } => "set_resource",
            Action::ResourceLoading => "resource_loading",
            Action::ResourceError { .. } => "resource_error",
            Action::UpdateResourceProperties { .. } => "update_resource_properties",
            Action::SetFavoriteResource { .. } => "set_favorite_resource",
            Action::SearchResources { .. } => "search_resources",
            Action::UpdateResources { .. } => "update_resources",
            Action::UpdateSingleResource { .. } => "update_single_resource",
            Action::UpdateResourcesMetadata { .. } => "update_resources_metadata",
            Action::LoadingResources { .. } => "loading_resources",
            Action::ReduceTotalCount => "reduce_total_count",
            Action::IncreaseTotalCount => "increase_total_count",
            Action::SetSearchConfig { .. } => "set_search_config",
            Action::GetFacetItems => "get_facet_items",
            Action::SetFacetItems { .. } => "set_facet_items",
            Action::SetFilters { .. } => "set_filters",
            Action::SetFeaturedResources { .. } => "set_featured_resources",
            Action::UpdateFeaturedResources { .. } => "update_featured_resources",
            Action::ShowNotification { .. } => "show_notification",
        }
    }

    pub fn download_metadata(link: impl Into<String>, pk: impl Into<ResourcePk>) -> Self {
        Action::DownloadMetadata {
            link: link.into(),
            pk: pk.into(),
        }
    }

    pub fn download_metadata_complete(
        link: impl Into<String>,
        pk: impl Into<ResourcePk>,
    ) -> Self {
        Action::DownloadMetadataComplete {
            link: link.into(),
            pk: pk.into(),
        }
    }

    pub fn error_notification(title: &str, message: impl Into<String>) -> Self {
        Action::ShowNotification {
            notification: Notification::error(title, message),
        }
    }
}

/// Fields reported alongside a page of search results. Only the fields
/// that are set are merged into the search state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesMetadata {
    pub total: Option<i64>,
    pub is_next_page_available: Option<bool>,
    pub error: Option<bool>,
    pub params: Option<SearchParams>,
    pub location_search: Option<String>,
    pub location_pathname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    pub pagination: bool,
    pub page_size: u32,
    #[serde(default)]
    pub default_query: SearchParams,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pagination: false,
            page_size: 20,
            default_query: SearchParams::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedPatch {
    pub resources: Option<Vec<Resource>>,
    pub page: Option<u32>,
    pub is_next_page_available: Option<bool>,
    pub is_previous_page_available: Option<bool>,
    pub loading: Option<bool>,
}

/// Carousel navigation. No direction reloads the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturedDirection {
    Next,
    Previous,
}

pub const DEFAULT_FEATURED_PAGE_SIZE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            level: NotificationLevel::Error,
            created_at: Utc::now(),
        }
    }
}
