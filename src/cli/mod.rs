pub mod commands;
pub mod fixtures;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::{CatalogStore, PgStore};
use crate::types::EntityKind;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Catalog CLI - manage shows, creators and genres from the command line")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create the catalog tables if they do not exist")]
    Init,

    #[command(about = "Insert the sample creators, genres and shows")]
    Populate,

    #[command(about = "Delete a creator, genre or show unless a show still refers to it")]
    Delete {
        #[arg(help = "Entity kind: creator, genre or show")]
        kind: EntityKind,
        #[arg(help = "Entity ID")]
        id: String,
        #[arg(long, help = "Only report what would block the delete")]
        dry_run: bool,
    },

    #[command(about = "List creators, genres or shows")]
    List {
        #[arg(help = "Entity kind: creators, genres or shows")]
        kind: EntityKind,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();

    let store = PgStore::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let result = match cli.command {
        Commands::Init => commands::init::handle(&store, output_format).await,
        Commands::Populate => commands::populate::handle(&store, output_format).await,
        Commands::Delete { kind, id, dry_run } => {
            commands::delete::handle(&store, kind, &id, dry_run, output_format).await
        }
        Commands::List { kind } => commands::list::handle(&store, kind, output_format).await,
    };

    store.close().await;
    result
}
