use serde::Serialize;

use crate::actions::Action;
use crate::download::DownloadState;
use crate::notifications::NotificationState;
use crate::resource::ResourceState;
use crate::search::SearchState;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub gnsearch: SearchState,
    pub gndownload: DownloadState,
    pub gnresource: ResourceState,
    pub notifications: NotificationState,
}

impl AppState {
    pub fn reduce(self, action: &Action) -> Self {
        Self {
            gnsearch: self.gnsearch.reduce(action),
            gndownload: self.gndownload.reduce(action),
            gnresource: self.gnresource.reduce(action),
            notifications: self.notifications.reduce(action),
        }
    }
}
