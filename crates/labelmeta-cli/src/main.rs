//! labelmeta
//!
//! Command-line access to the label metadata of a local project directory:
//! resolve assets, inspect their metadata, list a folder and apply
//! project-wide tag renames and deletions.

mod config;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use labelmeta_core::{Asset, AssetType};
use labelmeta_service::{
    AssetIdentity, DefaultAssetIdentity, FolderAssetProvider, MetadataServices, TagFields,
    TagOperation, TracingNotifier,
};
use labelmeta_storage::{AssetProvider, LocalFileStorage};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use config::AppConfig;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration directory
    #[arg(short, long, env = "CONFIG_DIR", default_value = "config")]
    config_dir: String,

    /// Environment (development, production, etc.)
    #[arg(short, long, env = "ENVIRONMENT", default_value = "development")]
    environment: String,

    /// Project directory
    #[arg(short, long, env = "LABELMETA_ROOT")]
    root: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a path into an asset record
    Resolve {
        path: String,

        /// Display name, defaults to the last path segment
        #[arg(long)]
        name: Option<String>,
    },

    /// Print the loaded metadata of an asset
    Show {
        /// Asset name relative to the project directory
        name: String,
    },

    /// List the supported assets directly inside a folder
    List { folder: Option<String> },

    /// Rename a tag across the project
    RenameTag {
        from: String,
        to: String,

        #[command(flatten)]
        fields: FieldArgs,

        #[arg(long)]
        dry_run: bool,
    },

    /// Delete a tag across the project
    DeleteTag {
        name: String,

        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(ClapArgs, Debug, Default)]
struct FieldArgs {
    /// New tag color
    #[arg(long)]
    color: Option<String>,

    /// New tag type
    #[arg(long = "type")]
    tag_type: Option<String>,

    /// New tag format
    #[arg(long)]
    format: Option<String>,
}

impl From<FieldArgs> for TagFields {
    fn from(args: FieldArgs) -> Self {
        TagFields {
            color: args.color,
            tag_type: args.tag_type,
            format: args.format,
        }
    }
}

/// Services wired to the project directory
struct Project {
    root: PathBuf,
    services: MetadataServices,
    provider: Arc<FolderAssetProvider>,
}

impl Project {
    fn open(config: &AppConfig) -> Result<Self> {
        let storage = LocalFileStorage::new(&config.storage.root);
        let notifier = Arc::new(TracingNotifier);
        let identity: Arc<dyn AssetIdentity> = Arc::new(DefaultAssetIdentity::new(
            Arc::new(storage.clone()),
            notifier.clone(),
        ));
        let provider = Arc::new(FolderAssetProvider::new(storage.clone(), identity.clone()));

        let storage = Arc::new(storage);
        let services = MetadataServices::builder()
            .storage(storage.clone())
            .reader(storage)
            .provider(provider.clone())
            .identity(identity)
            .notifier(notifier)
            .config(config.metadata.clone())
            .build()
            .map_err(anyhow::Error::msg)?;

        Ok(Self {
            root: config.storage.root.clone(),
            services,
            provider,
        })
    }

    /// Every supported asset of the project, nested folders included
    async fn all_assets(&self) -> Result<Vec<Asset>> {
        let assets = self
            .provider
            .list_assets(None)
            .await
            .context("Failed to list project assets")?;
        Ok(assets
            .into_iter()
            .filter(|a| a.asset_type != AssetType::Unknown)
            .collect())
    }

    async fn apply(&self, operation: TagOperation, dry_run: bool) -> Result<Vec<String>> {
        let assets = self.all_assets().await?;
        let changed = self
            .services
            .tags
            .update_assets(&assets, &operation)
            .await
            .context("Tag operation failed")?;

        let mut names = Vec::with_capacity(changed.len());
        for metadata in changed {
            names.push(metadata.asset.name.clone());
            if !dry_run {
                self.services
                    .store
                    .save(metadata)
                    .await
                    .context("Failed to save metadata")?;
            }
        }
        info!(tag = operation.tag_name(), changed = names.len(), dry_run, "Tag operation finished");
        Ok(names)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = AppConfig::load_or_default(&args.config_dir, &args.environment);
    if let Some(root) = args.root {
        config.storage.root = root;
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }

    telemetry::init_with_config(telemetry::TelemetryConfig::from(&config.logging));
    info!(root = %config.storage.root.display(), environment = %args.environment, "Opening project");

    let project = Project::open(&config)?;

    match args.command {
        Command::Resolve { path, name } => {
            let asset = project
                .services
                .identity
                .resolve(&path, name.as_deref())
                .await
                .with_context(|| format!("Failed to resolve {}", path))?;
            print_json(&asset)?;
        }
        Command::Show { name } => {
            let root = tokio::fs::canonicalize(&project.root)
                .await
                .with_context(|| format!("Project directory {} not found", project.root.display()))?;
            let path = root.join(&name);
            let asset = project
                .services
                .identity
                .resolve(&path.to_string_lossy(), Some(&name))
                .await
                .with_context(|| format!("Failed to resolve {}", name))?;
            let metadata = project
                .services
                .store
                .load(&asset)
                .await
                .with_context(|| format!("Failed to load metadata of {}", name))?;
            print_json(&metadata)?;
        }
        Command::List { folder } => {
            let assets = project
                .services
                .catalog
                .list_assets(folder.as_deref())
                .await
                .context("Failed to list assets")?;
            print_json(&assets)?;
        }
        Command::RenameTag {
            from,
            to,
            fields,
            dry_run,
        } => {
            let operation = TagOperation::Rename {
                from,
                to,
                fields: fields.into(),
            };
            print_json(&project.apply(operation, dry_run).await?)?;
        }
        Command::DeleteTag { name, dry_run } => {
            print_json(&project.apply(TagOperation::delete(name), dry_run).await?)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rename_tag() {
        let args = Args::try_parse_from([
            "labelmeta",
            "--root",
            "/data",
            "rename-tag",
            "Person",
            "Human",
            "--color",
            "#ff0000",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/data")));
        match args.command {
            Command::RenameTag {
                from,
                to,
                fields,
                dry_run,
            } => {
                assert_eq!(from, "Person");
                assert_eq!(to, "Human");
                assert_eq!(fields.color.as_deref(), Some("#ff0000"));
                assert!(fields.tag_type.is_none());
                assert!(dry_run);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_without_folder() {
        let args = Args::try_parse_from(["labelmeta", "list"]).unwrap();
        assert!(matches!(args.command, Command::List { folder: None }));
    }

    #[tokio::test]
    async fn test_delete_tag_dry_run_leaves_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
        let labels = r#"{"document": "a.png", "labels": [{"label": "Person", "value": [{"page": 1, "boundingBoxes": [[0, 0, 1, 1]]}]}]}"#;
        std::fs::write(dir.path().join("a.png.labels.json"), labels).unwrap();

        let mut config = AppConfig::default();
        config.storage.root = dir.path().to_path_buf();
        let project = Project::open(&config).unwrap();

        let changed = project.apply(TagOperation::delete("Person"), true).await.unwrap();
        assert_eq!(changed, vec!["a.png".to_string()]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.png.labels.json")).unwrap(),
            labels
        );

        project.apply(TagOperation::delete("Person"), false).await.unwrap();
        assert!(!dir.path().join("a.png.labels.json").exists());
        assert!(dir.path().join("a.png.generators.json").exists());
    }
}
