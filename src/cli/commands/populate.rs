use serde_json::json;

use crate::cli::fixtures;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::CatalogStore;

pub async fn handle<S>(store: &S, output_format: OutputFormat) -> anyhow::Result<()>
where
    S: CatalogStore + ?Sized,
{
    let populated = fixtures::populate(store).await?;

    output_success(
        &output_format,
        &format!(
            "Added {} creators, {} genres and {} shows",
            populated.creators.len(),
            populated.genres.len(),
            populated.shows.len()
        ),
        Some(json!({
            "creators": populated.creators.len(),
            "genres": populated.genres.len(),
            "shows": populated.shows.len(),
        })),
    )
}
