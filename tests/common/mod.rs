#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::Value;

use geonode_catalog_client::actions::Action;
use geonode_catalog_client::api::{CatalogClient, LinkPayload};
use geonode_catalog_client::domain::{
    FeaturedPage, Link, Resource, ResourcePage, ResourcePk, ResourceQuery,
};
use geonode_catalog_client::effects::Dispatcher;
use geonode_catalog_client::error::CatalogError;
use geonode_catalog_client::save::{Blob, FileSaveSink};

#[derive(Default)]
pub struct MockCatalog {
    pub payload: Option<LinkPayload>,
    pub favorite_error: Option<(u16, Option<String>)>,
    pub page: Option<ResourcePage>,
    pub resource: Option<Resource>,
    pub facets: Vec<Value>,
    pub facets_panic: bool,
    pub featured: Option<FeaturedPage>,
    pub calls: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<ResourceQuery>>,
}

impl MockCatalog {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CatalogClient for MockCatalog {
    fn fetch_link(&self, url: &str) -> Result<LinkPayload, CatalogError> {
        self.record(format!("GET {url}"));
        self.payload
            .clone()
            .ok_or_else(|| CatalogError::Http("connection refused".to_string()))
    }

    fn set_favorite(&self, pk: &ResourcePk, favorite: bool) -> Result<(), CatalogError> {
        let method = if favorite { "POST" } else { "DELETE" };
        self.record(format!("{method} {pk}/favorite"));
        match &self.favorite_error {
            Some((status, message)) => Err(CatalogError::Status {
                status: *status,
                message: message.clone(),
                detail: None,
            }),
            None => Ok(()),
        }
    }

    fn get_resources(&self, query: &ResourceQuery) -> Result<ResourcePage, CatalogError> {
        self.record(format!("GET resources page={}", query.page));
        self.queries.lock().unwrap().push(query.clone());
        self.page.clone().ok_or(CatalogError::Status {
            status: 500,
            message: None,
            detail: Some("search backend down".to_string()),
        })
    }

    fn get_resource(&self, pk: &ResourcePk) -> Result<Resource, CatalogError> {
        self.record(format!("GET resources/{pk}"));
        self.resource
            .clone()
            .filter(|resource| &resource.pk == pk)
            .ok_or(CatalogError::Status {
                status: 404,
                message: None,
                detail: Some("Not found.".to_string()),
            })
    }

    fn get_facet_items(&self) -> Result<Vec<Value>, CatalogError> {
        self.record("GET facets".to_string());
        if self.facets_panic {
            panic!("facet endpoint returned garbage");
        }
        Ok(self.facets.clone())
    }

    fn get_featured_resources(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<FeaturedPage, CatalogError> {
        self.record(format!("GET featured page={page} page_size={page_size}"));
        self.featured.clone().ok_or(CatalogError::Status {
            status: 502,
            message: Some("featured list unavailable".to_string()),
            detail: None,
        })
    }
}

#[derive(Default)]
pub struct MemorySink {
    pub fail: bool,
    pub saved: Mutex<Vec<(Blob, String)>>,
}

impl FileSaveSink for MemorySink {
    fn save(&self, blob: &Blob, filename: &str) -> Result<(), CatalogError> {
        if self.fail {
            return Err(CatalogError::Filesystem("disk full".to_string()));
        }
        self.saved
            .lock()
            .unwrap()
            .push((blob.clone(), filename.to_string()));
        Ok(())
    }
}

pub fn recorder() -> (Dispatcher, Arc<Mutex<Vec<Action>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let dispatcher = Dispatcher::new(move |action| sink.lock().unwrap().push(action));
    (dispatcher, log)
}

pub fn kinds(actions: &[Action]) -> Vec<&'static str> {
    actions.iter().map(Action::kind).collect()
}

pub fn rivers() -> Resource {
    let mut resource = Resource::new(1u64, "Rivers");
    resource.resource_type = Some("dataset".to_string());
    resource.links = vec![
        Link {
            name: "ISO".to_string(),
            url: "https://demo.geonode.org/catalogue/csw?id=1&outputschema=iso".to_string(),
            mime: None,
        },
        Link {
            name: "Dublin Core".to_string(),
            url: "https://demo.geonode.org/catalogue/csw?id=1&outputschema=dc".to_string(),
            mime: None,
        },
    ];
    resource
}

pub fn xml_payload(body: &str) -> LinkPayload {
    LinkPayload {
        data: body.as_bytes().to_vec(),
        content_type: Some("application/xml; charset=UTF-8".to_string()),
    }
}
