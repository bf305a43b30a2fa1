use std::io::{self, Write};

use serde::Serialize;

use crate::download::DownloadState;
use crate::resource::ResourceState;
use crate::search::{FeaturedResources, SearchState};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Json,
    Summary,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_search(state: &SearchState) -> io::Result<()> {
        Self::print_json(state)
    }

    pub fn print_featured(state: &FeaturedResources) -> io::Result<()> {
        Self::print_json(state)
    }

    pub fn print_downloads(state: &DownloadState) -> io::Result<()> {
        Self::print_json(state)
    }

    pub fn print_resource(state: &ResourceState) -> io::Result<()> {
        Self::print_json(state)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub fn print_search_summary(state: &SearchState) {
    println!(
        "{} of {} resources (next page: {})",
        state.resources.len(),
        state.total,
        if state.is_next_page_available { "yes" } else { "no" }
    );
    for resource in &state.resources {
        let star = if resource.favorite { "*" } else { " " };
        println!(
            "{star} {:>6}  {:<10} {}",
            resource.pk.as_str(),
            resource.resource_type.as_deref().unwrap_or("-"),
            resource.title
        );
    }
}

pub fn print_notifications(state: &AppState) {
    for notification in state.notifications.errors() {
        eprintln!("error: {} ({})", notification.message, notification.title);
    }
}
