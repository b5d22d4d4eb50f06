use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::{schema, PgStore};

pub async fn handle(store: &PgStore, output_format: OutputFormat) -> anyhow::Result<()> {
    schema::ensure_schema(store.pool()).await?;
    output_success(&output_format, "Catalog schema is ready", None)
}
