use serde::Serialize;

use crate::actions::Action;
use crate::domain::Resource;

/// The resource currently opened in the detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceState {
    pub data: Option<Resource>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ResourceState {
    pub fn reduce(mut self, action: &Action) -> Self {
        match action {
            Action::ResourceLoading => {
                self.loading = true;
                self.error = None;
            }
            Action::SetResource { resource } => {
                self.data = resource.clone();
                self.loading = false;
                self.error = None;
            }
            Action::ResourceError { message } => {
                self.loading = false;
                self.error = Some(message.clone());
            }
            Action::UpdateResourceProperties { patch } => {
                if let Some(data) = self.data.as_mut() {
                    data.apply(patch);
                }
            }
            _ => {}
        }
        self
    }
}
