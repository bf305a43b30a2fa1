use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CatalogError;

/// Primary key of a catalog resource. The API hands out numbers or strings;
/// both are kept in their textual form so `1` and `"1"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourcePk(String);

impl ResourcePk {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourcePk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourcePk {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(CatalogError::InvalidPk(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<u64> for ResourcePk {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ResourcePk {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(Self::from(value)),
            Raw::Text(value) => value.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Metadata export format label with internal spaces collapsed
/// (`"Dublin Core"` becomes `"DublinCore"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatKey(String);

impl FormatKey {
    pub fn from_label(label: &str) -> Self {
        Self(label.split(' ').collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub pk: ResourcePk,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub perms: BTreeSet<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    pub fn new(pk: impl Into<ResourcePk>, title: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            title: title.into(),
            resource_type: None,
            href: None,
            download_url: None,
            links: Vec::new(),
            perms: BTreeSet::new(),
            favorite: false,
            extra: Map::new(),
        }
    }

    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.name == name)
    }

    pub fn apply(&mut self, patch: &ResourcePatch) {
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        for (key, value) in &patch.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Partial update of the viewed resource; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourcePatch {
    pub fn favorite(value: bool) -> Self {
        Self {
            favorite: Some(value),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    pub fn values(&self) -> Vec<&str> {
        match self {
            ParamValue::One(value) => vec![value.as_str()],
            ParamValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            ParamValue::One(value) => value.is_empty(),
            ParamValue::Many(values) => values.is_empty(),
        }
    }
}

/// Query parameters of a catalog search (`q`, `f`, `sort`, `page`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchParams(BTreeMap<String, ParamValue>);

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.remove(key) {
            Some(ParamValue::One(prev)) => {
                self.0
                    .insert(key.to_string(), ParamValue::Many(vec![prev, value]));
            }
            Some(ParamValue::Many(mut values)) => {
                values.push(value);
                self.0.insert(key.to_string(), ParamValue::Many(values));
            }
            None => {
                self.0.insert(key.to_string(), ParamValue::One(value));
            }
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), ParamValue::One(value.into()));
    }

    /// Sets `key` to `value`, dropping whatever it held before.
    pub fn replace(&mut self, key: &str, value: ParamValue) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn values(&self, key: &str) -> Vec<&str> {
        self.0.get(key).map(ParamValue::values).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops keys whose value is empty.
    pub fn cleaned(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    pub fn without(&self, key: &str) -> Self {
        let mut params = self.clone();
        params.0.remove(key);
        params
    }

    pub fn page(&self) -> Option<u32> {
        self.values("page")
            .first()
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|page| *page >= 1.0)
            .map(|page| page as u32)
    }

    pub fn is_favorite_list(&self) -> bool {
        self.values("f").iter().any(|value| value.contains("favorite"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQuery {
    pub params: SearchParams,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePage {
    pub resources: Vec<Resource>,
    pub total: i64,
    pub is_next_page_available: bool,
}

/// One page of the featured carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedPage {
    pub resources: Vec<Resource>,
    pub page: u32,
    pub is_next_page_available: bool,
    pub is_previous_page_available: bool,
}
