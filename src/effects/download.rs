use crate::actions::Action;
use crate::api::{CatalogClient, LinkPayload};
use crate::domain::ResourcePk;
use crate::effects::{Dispatcher, StateHandle};
use crate::error::{CANNOT_PERFORM_ACTION, CatalogError};
use crate::save::{Blob, FileSaveSink};

const EXCEPTION_REPORT_MARKER: &str = "<ows:ExceptionReport";

/// Downloads the metadata document behind the viewed resource's `link` and
/// hands it to the save sink. The completion action is emitted whatever the
/// outcome, so the in-flight flag is always cleared.
pub fn handle_download_metadata<C, S>(
    client: &C,
    saver: &S,
    link: &str,
    pk: &ResourcePk,
    state: &StateHandle,
    out: &Dispatcher,
) -> Result<(), CatalogError>
where
    C: CatalogClient + ?Sized,
    S: FileSaveSink + ?Sized,
{
    let snapshot = state.snapshot();
    let resource = snapshot
        .gnresource
        .data
        .as_ref()
        .ok_or(CatalogError::MissingResource)?;
    let url = resource
        .link(link)
        .map(|entry| entry.url.clone())
        .ok_or_else(|| CatalogError::MissingLink {
            pk: resource.pk.to_string(),
            link: link.to_string(),
        })?;
    let filename = metadata_filename(&resource.title, link);

    tracing::debug!(pk = %pk, link, url = %url, "downloading metadata");
    match fetch_and_save(client, saver, &url, &filename) {
        Ok(()) => {
            tracing::info!(pk = %pk, link, filename = %filename, "metadata downloaded");
            out.emit(Action::download_metadata_complete(link, pk.clone()));
        }
        Err(err) => {
            tracing::warn!(pk = %pk, link, error = %err, "metadata download failed");
            out.emit(Action::download_metadata_complete(link, pk.clone()));
            out.emit(Action::error_notification(
                CANNOT_PERFORM_ACTION,
                err.notification_message(),
            ));
        }
    }
    Ok(())
}

fn fetch_and_save<C, S>(client: &C, saver: &S, url: &str, filename: &str) -> Result<(), CatalogError>
where
    C: CatalogClient + ?Sized,
    S: FileSaveSink + ?Sized,
{
    let payload = client.fetch_link(url)?;
    check_exception_report(&payload)?;
    let blob = Blob {
        data: payload.data,
        mime: payload.content_type,
    };
    saver.save(&blob, filename)
}

/// OGC services answer errors with `200 OK` and an XML exception report.
pub fn check_exception_report(payload: &LinkPayload) -> Result<(), CatalogError> {
    let is_xml = payload
        .content_type
        .as_deref()
        .map(is_xml_content_type)
        .unwrap_or(false);
    if !is_xml {
        return Ok(());
    }
    let text = String::from_utf8_lossy(&payload.data);
    if text.starts_with(EXCEPTION_REPORT_MARKER) {
        return Err(CatalogError::ServiceException(text.into_owned()));
    }
    Ok(())
}

pub fn is_xml_content_type(content_type: &str) -> bool {
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    media_type.eq_ignore_ascii_case("application/xml") || media_type.eq_ignore_ascii_case("text/xml")
}

pub fn metadata_filename(title: &str, link: &str) -> String {
    format!("{title}_{}_Metadata", link.replace(' ', "_"))
}
