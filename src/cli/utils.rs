use serde_json::{json, Value};

use crate::api::views::DeleteView;
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output a delete confirmation: the entity and the shows that refer to it
pub fn output_delete_view(output_format: &OutputFormat, view: &DeleteView) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": !view.blocked,
                    "data": view
                }))?
            );
        }
        OutputFormat::Text => {
            let id = view.entity.get("id").and_then(Value::as_str).unwrap_or("-");
            println!("{}: {}", view.title, id);

            if view.dependents.is_empty() {
                println!("No shows refer to it");
                return Ok(());
            }

            println!("Referenced by {} show(s):", view.dependent_count);
            println!("{:<38} {}", "ID", "TITLE");
            println!("{}", "-".repeat(70));
            for show in &view.dependents {
                println!("{:<38} {}", show.id, show.title);
            }
        }
    }
    Ok(())
}
