use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::domain::{FeaturedPage, Resource, ResourcePage, ResourcePk, ResourceQuery};
use crate::error::CatalogError;

/// Raw payload of a resource link together with its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkPayload {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

pub trait CatalogClient: Send + Sync {
    fn fetch_link(&self, url: &str) -> Result<LinkPayload, CatalogError>;
    fn set_favorite(&self, pk: &ResourcePk, favorite: bool) -> Result<(), CatalogError>;
    fn get_resources(&self, query: &ResourceQuery) -> Result<ResourcePage, CatalogError>;
    fn get_resource(&self, pk: &ResourcePk) -> Result<Resource, CatalogError>;
    fn get_facet_items(&self) -> Result<Vec<Value>, CatalogError>;
    fn get_featured_resources(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<FeaturedPage, CatalogError>;
}

impl<T: CatalogClient + ?Sized> CatalogClient for Arc<T> {
    fn fetch_link(&self, url: &str) -> Result<LinkPayload, CatalogError> {
        (**self).fetch_link(url)
    }

    fn set_favorite(&self, pk: &ResourcePk, favorite: bool) -> Result<(), CatalogError> {
        (**self).set_favorite(pk, favorite)
    }

    fn get_resources(&self, query: &ResourceQuery) -> Result<ResourcePage, CatalogError> {
        (**self).get_resources(query)
    }

    fn get_resource(&self, pk: &ResourcePk) -> Result<Resource, CatalogError> {
        (**self).get_resource(pk)
    }

    fn get_facet_items(&self) -> Result<Vec<Value>, CatalogError> {
        (**self).get_facet_items()
    }

    fn get_featured_resources(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<FeaturedPage, CatalogError> {
        (**self).get_featured_resources(page, page_size)
    }
}

#[derive(Clone)]
pub struct CatalogHttpClient {
    client: Client,
    config: ClientConfig,
}

#[derive(Debug, Deserialize)]
struct ResourcesResponse {
    #[serde(default)]
    total: i64,
    #[serde(default)]
    links: PageLinks,
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Default, Deserialize)]
struct PageLinks {
    next: Option<String>,
    previous: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeaturedResponse {
    page: Option<u32>,
    #[serde(default)]
    links: PageLinks,
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    resource: Resource,
}

#[derive(Debug, Deserialize)]
struct FacetsResponse {
    #[serde(default)]
    facets: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
}

impl CatalogHttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("gn-catalog/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| CatalogError::Http(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| CatalogError::Http(err.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.query(&[("apikey", key.as_str())]),
            None => request,
        }
    }

    fn resource_url(&self, pk: &ResourcePk) -> Result<String, CatalogError> {
        let base = self.config.endpoint_url("resources")?;
        Ok(format!("{}/{}", base.trim_end_matches('/'), pk.as_str()))
    }

    fn handle_status(response: Response) -> Result<Response, CatalogError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorBody>(&body).unwrap_or_default();
        tracing::debug!(status, body = %body, "catalog request rejected");
        Err(CatalogError::Status {
            status,
            message: parsed.message,
            detail: parsed.detail,
        })
    }

    fn send_with_retries<F>(&self, mut make_req: F) -> Result<Response, CatalogError>
    where
        F: FnMut() -> RequestBuilder,
    {
        const MAX_RETRIES: usize = 3;
        const BASE_DELAY_MS: u64 = 200;
        let mut attempt = 0usize;
        loop {
            match make_req().send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if attempt < MAX_RETRIES && is_retryable_status(status) {
                        let delay = BASE_DELAY_MS * (attempt as u64 + 1);
                        thread::sleep(Duration::from_millis(delay));
                        attempt += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(err) => {
                    if attempt < MAX_RETRIES && is_retryable_error(&err) {
                        let delay = BASE_DELAY_MS * (attempt as u64 + 1);
                        thread::sleep(Duration::from_millis(delay));
                        attempt += 1;
                        continue;
                    }
                    return Err(CatalogError::Http(err.to_string()));
                }
            }
        }
    }
}

impl CatalogClient for CatalogHttpClient {
    fn fetch_link(&self, url: &str) -> Result<LinkPayload, CatalogError> {
        let url = self.config.resolve_url(url);
        let mut request = self.client.get(&url);
        if same_origin(&url, &self.config.api_base_url) {
            request = self.with_api_key(request);
        }
        let response = request
            .send()
            .map_err(|err| CatalogError::Http(err.to_string()))?;
        let response = Self::handle_status(response)?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let data = response
            .bytes()
            .map_err(|err| CatalogError::Http(err.to_string()))?
            .to_vec();
        Ok(LinkPayload { data, content_type })
    }

    fn set_favorite(&self, pk: &ResourcePk, favorite: bool) -> Result<(), CatalogError> {
        let url = format!("{}/favorite", self.resource_url(pk)?);
        let request = if favorite {
            self.client.post(&url)
        } else {
            self.client.delete(&url)
        };
        let response = self
            .with_api_key(request)
            .send()
            .map_err(|err| CatalogError::Http(err.to_string()))?;
        Self::handle_status(response)?;
        Ok(())
    }

    fn get_resources(&self, query: &ResourceQuery) -> Result<ResourcePage, CatalogError> {
        let url = self.config.endpoint_url("resources")?;
        let pairs = resource_query_pairs(query);
        let response = self.send_with_retries(|| {
            self.with_api_key(self.client.get(&url))
                .header(ACCEPT, "application/json")
                .query(&pairs)
        })?;
        let response = Self::handle_status(response)?;
        let body: ResourcesResponse = response
            .json()
            .map_err(|err| CatalogError::Http(err.to_string()))?;
        Ok(ResourcePage {
            resources: body.resources,
            total: body.total,
            is_next_page_available: body.links.next.is_some(),
        })
    }

    fn get_resource(&self, pk: &ResourcePk) -> Result<Resource, CatalogError> {
        let url = self.resource_url(pk)?;
        let response = self.send_with_retries(|| {
            self.with_api_key(self.client.get(&url))
                .query(&[("include[]", "executions")])
        })?;
        let response = Self::handle_status(response)?;
        let body: ResourceResponse = response
            .json()
            .map_err(|err| CatalogError::Http(err.to_string()))?;
        Ok(body.resource)
    }

    fn get_facet_items(&self) -> Result<Vec<Value>, CatalogError> {
        let url = self.config.endpoint_url("facets")?;
        let response = self.send_with_retries(|| self.with_api_key(self.client.get(&url)))?;
        let response = Self::handle_status(response)?;
        let body: FacetsResponse = response
            .json()
            .map_err(|err| CatalogError::Http(err.to_string()))?;
        Ok(body.facets)
    }

    fn get_featured_resources(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<FeaturedPage, CatalogError> {
        let url = self.config.endpoint_url("resources")?;
        let pairs = [
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
            ("filter{featured}", "true".to_string()),
        ];
        let response = self.send_with_retries(|| {
            self.with_api_key(self.client.get(&url))
                .header(ACCEPT, "application/json")
                .query(&pairs)
        })?;
        let response = Self::handle_status(response)?;
        let body: FeaturedResponse = response
            .json()
            .map_err(|err| CatalogError::Http(err.to_string()))?;
        Ok(FeaturedPage {
            resources: body.resources,
            page: body.page.unwrap_or(page),
            is_next_page_available: body.links.next.is_some(),
            is_previous_page_available: body.links.previous.is_some(),
        })
    }
}

/// True when both URLs share scheme, host and port. Relative or unparsable
/// URLs never match.
pub fn same_origin(url: &str, base: &str) -> bool {
    match (Url::parse(url), Url::parse(base)) {
        (Ok(url), Ok(base)) => url.origin() == base.origin(),
        _ => false,
    }
}

/// Query string for the resources endpoint. `q` becomes a title/abstract
/// search and services are excluded.
pub fn resource_query_pairs(query: &ResourceQuery) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in query.params.cleaned().iter() {
        match key.as_str() {
            "page" => {}
            "q" => {
                for text in value.values() {
                    pairs.push(("search".to_string(), text.to_string()));
                }
                pairs.push(("search_fields".to_string(), "title".to_string()));
                pairs.push(("search_fields".to_string(), "abstract".to_string()));
            }
            _ => {
                for item in value.values() {
                    pairs.push((key.clone(), item.to_string()));
                }
            }
        }
    }
    pairs.push(("page".to_string(), query.page.to_string()));
    pairs.push(("page_size".to_string(), query.page_size.to_string()));
    pairs.push(("filter{metadata_only}".to_string(), "false".to_string()));
    pairs.push(("include[]".to_string(), "executions".to_string()));
    pairs
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
