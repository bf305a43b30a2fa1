use crate::actions::Action;
use crate::api::CatalogClient;
use crate::domain::{Resource, ResourcePatch};
use crate::effects::{Dispatcher, StateHandle};
use crate::error::{CANNOT_PERFORM_ACTION, CatalogError};

/// Two-phase favorite toggle: apply `favorite` to the viewed resource at
/// once, persist it, then either reconcile the result list or revert to
/// `!favorite`.
pub fn handle_favorite_toggle<C>(
    client: &C,
    favorite: bool,
    state: &StateHandle,
    out: &Dispatcher,
) -> Result<(), CatalogError>
where
    C: CatalogClient + ?Sized,
{
    let resource = state
        .snapshot()
        .gnresource
        .data
        .ok_or(CatalogError::MissingResource)?;

    out.emit(Action::UpdateResourceProperties {
        patch: ResourcePatch::favorite(favorite),
    });

    match client.set_favorite(&resource.pk, favorite) {
        Ok(()) => {
            tracing::info!(pk = %resource.pk, favorite, "favorite saved");
            for action in reconcile_results(&resource, favorite, state) {
                out.emit(action);
            }
        }
        Err(err) => {
            tracing::warn!(pk = %resource.pk, favorite, error = %err, "favorite not saved, reverting");
            out.emit(Action::UpdateResourceProperties {
                patch: ResourcePatch::favorite(!favorite),
            });
            out.emit(Action::error_notification(
                CANNOT_PERFORM_ACTION,
                err.notification_message(),
            ));
        }
    }
    Ok(())
}

/// Result list updates after a confirmed toggle, computed from the state at
/// response time.
fn reconcile_results(toggled: &Resource, favorite: bool, state: &StateHandle) -> Vec<Action> {
    let current = state.snapshot();
    let search = current.gnsearch;
    if !search.params.is_favorite_list() {
        return vec![Action::UpdateResources {
            resources: search.resources,
            reset: true,
        }];
    }

    let present = search.resources.iter().any(|item| item.pk == toggled.pk);
    let mut resources = search.resources;
    if !favorite && present {
        resources.retain(|item| item.pk != toggled.pk);
    } else if favorite && !present {
        let mut added = current
            .gnresource
            .data
            .filter(|data| data.pk == toggled.pk)
            .unwrap_or_else(|| toggled.clone());
        added.favorite = true;
        resources.push(added);
    }

    let count = if favorite {
        Action::IncreaseTotalCount
    } else {
        Action::ReduceTotalCount
    };
    vec![
        Action::UpdateResources {
            resources,
            reset: true,
        },
        count,
    ]
}
