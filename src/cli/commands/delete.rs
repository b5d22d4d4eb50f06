use crate::api::format::ApiFormat;
use crate::api::views::DeleteView;
use crate::cli::utils::{output_delete_view, output_success};
use crate::cli::OutputFormat;
use crate::database::models::{Creator, Genre, Show};
use crate::database::{CatalogStore, Deletable, Repository, ShowRepository};
use crate::services::delete_service::{confirm_delete, prepare_delete, DeleteOutcome, PrepareOutcome};
use crate::types::EntityKind;

pub async fn handle<S>(
    store: &S,
    kind: EntityKind,
    id: &str,
    dry_run: bool,
    output_format: OutputFormat,
) -> anyhow::Result<()>
where
    S: CatalogStore + ?Sized,
{
    match kind {
        EntityKind::Creator => delete::<Creator, S>(store, id, dry_run, &output_format).await,
        EntityKind::Genre => delete::<Genre, S>(store, id, dry_run, &output_format).await,
        EntityKind::Show => delete::<Show, S>(store, id, dry_run, &output_format).await,
    }
}

async fn delete<E, S>(store: &S, id: &str, dry_run: bool, output_format: &OutputFormat) -> anyhow::Result<()>
where
    E: Deletable + ApiFormat,
    S: Repository<E> + ShowRepository + ?Sized,
{
    let label = E::KIND.label();

    if dry_run {
        return match prepare_delete::<E, S>(store, id).await? {
            PrepareOutcome::Ready(confirmation) => {
                output_delete_view(output_format, &DeleteView::from_confirmation(&confirmation))
            }
            PrepareOutcome::NotFound => output_success(output_format, &format!("{} {} does not exist", label, id), None),
        };
    }

    match confirm_delete::<E, S>(store, id).await? {
        DeleteOutcome::Removed => output_success(output_format, &format!("Deleted {} {}", E::KIND, id), None),
        DeleteOutcome::NotFound => output_success(
            output_format,
            &format!("{} {} does not exist, nothing to delete", label, id),
            None,
        ),
        DeleteOutcome::Blocked(confirmation) => {
            let view = DeleteView::from_confirmation(&confirmation);
            output_delete_view(output_format, &view)?;
            Err(anyhow::anyhow!(
                "{} {} is still referenced by {} show(s)",
                label,
                id,
                view.dependent_count
            ))
        }
    }
}
