use std::collections::BTreeMap;

use serde::Serialize;

use crate::actions::Action;
use crate::domain::{FormatKey, ResourcePk};

/// In-flight metadata downloads per format. A pk present in a format's map
/// is downloading; completion removes the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadState {
    pub downloads: BTreeMap<FormatKey, BTreeMap<ResourcePk, bool>>,
}

impl Default for DownloadState {
    fn default() -> Self {
        Self::with_formats(["ISO", "Dublin Core"])
    }
}

impl DownloadState {
    pub fn with_formats<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let downloads = labels
            .into_iter()
            .map(|label| (FormatKey::from_label(label.as_ref()), BTreeMap::new()))
            .collect();
        Self { downloads }
    }

    pub fn is_downloading(&self, link: &str, pk: &ResourcePk) -> bool {
        self.downloads
            .get(&FormatKey::from_label(link))
            .map(|entries| entries.contains_key(pk))
            .unwrap_or(false)
    }

    pub fn in_flight(&self) -> usize {
        self.downloads.values().map(BTreeMap::len).sum()
    }

    pub fn reduce(mut self, action: &Action) -> Self {
        match action {
            Action::DownloadMetadata { link, pk } => {
                self.downloads
                    .entry(FormatKey::from_label(link))
                    .or_default()
                    .insert(pk.clone(), true);
                self
            }
            Action::DownloadMetadataComplete { link, pk } => {
                if let Some(entries) = self.downloads.get_mut(&FormatKey::from_label(link)) {
                    entries.remove(pk);
                }
                self
            }
            _ => self,
        }
    }
}
