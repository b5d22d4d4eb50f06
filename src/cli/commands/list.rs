use serde_json::json;

use crate::api::format::{entities_to_api_array, ApiFormat};
use crate::cli::utils::output_empty_collection;
use crate::cli::OutputFormat;
use crate::database::models::{Creator, Genre, Show};
use crate::database::{CatalogStore, Repository};
use crate::types::EntityKind;

pub async fn handle<S>(store: &S, kind: EntityKind, output_format: OutputFormat) -> anyhow::Result<()>
where
    S: CatalogStore + ?Sized,
{
    match kind {
        EntityKind::Creator => {
            let creators = <S as Repository<Creator>>::list(store).await?;
            print_rows(&creators, &output_format, |c| c.name())
        }
        EntityKind::Genre => {
            let genres = <S as Repository<Genre>>::list(store).await?;
            print_rows(&genres, &output_format, |g| g.name.clone())
        }
        EntityKind::Show => {
            let shows = <S as Repository<Show>>::list(store).await?;
            print_rows(&shows, &output_format, |s| s.title.clone())
        }
    }
}

fn print_rows<E: ApiFormat>(
    rows: &[E],
    output_format: &OutputFormat,
    label: impl Fn(&E) -> String,
) -> anyhow::Result<()> {
    let plural = E::KIND.plural();
    if rows.is_empty() {
        return output_empty_collection(output_format, plural, &format!("No {} in the catalog", plural));
    }

    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ plural: entities_to_api_array(rows) }))?
            );
        }
        OutputFormat::Text => {
            println!("{:<38} {}", "ID", E::KIND.label().to_uppercase());
            println!("{}", "-".repeat(70));
            for row in rows {
                println!("{:<38} {}", row.id(), label(row));
            }
        }
    }
    Ok(())
}
