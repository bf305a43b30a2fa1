use std::collections::VecDeque;

use serde::Serialize;

use crate::actions::{Action, Notification};

const MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotificationState {
    pub items: VecDeque<Notification>,
}

impl NotificationState {
    pub fn reduce(mut self, action: &Action) -> Self {
        if let Action::ShowNotification { notification } = action {
            if self.items.len() == MAX_NOTIFICATIONS {
                self.items.pop_front();
            }
            self.items.push_back(notification.clone());
        }
        self
    }

    pub fn errors(&self) -> impl Iterator<Item = &Notification> {
        self.items
            .iter()
            .filter(|item| item.level == crate::actions::NotificationLevel::Error)
    }
}
