use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_ENDPOINT: &str = "https://southcentralus.api.cognitive.microsoft.com";

/// Migrate a Custom Vision project to another account, or export it locally in Pascal VOC format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Source project ID
    #[arg(short = 'p', long = "project")]
    pub project_id: String,

    /// Source training key
    #[arg(short = 's', long = "src", env = "CUSTOM_VISION_SOURCE_KEY", hide_env_values = true)]
    pub source_training_key: String,

    /// Source endpoint
    #[arg(long = "src_endpoint", default_value = DEFAULT_ENDPOINT)]
    pub source_endpoint: String,

    /// Export the project locally in Pascal VOC format instead of migrating it
    #[arg(short = 'x', long = "export")]
    pub export: bool,

    /// Destination training key
    #[arg(
        short = 'd',
        long = "dest",
        env = "CUSTOM_VISION_DEST_KEY",
        hide_env_values = true,
        required_unless_present = "export"
    )]
    pub destination_training_key: Option<String>,

    /// Destination endpoint
    #[arg(long = "dest_endpoint", default_value = DEFAULT_ENDPOINT)]
    pub destination_endpoint: String,

    /// Directory receiving tags.json, images and annotations in export mode
    #[arg(long = "export_dir", default_value = "export")]
    pub export_dir: PathBuf,

    /// Also export untagged images, with object-free annotations
    #[arg(long = "include_background")]
    pub include_background: bool,
}

/// Where the run writes to
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Remote { training_key: String, endpoint: String },
    Export { dir: PathBuf, include_background: bool },
}

impl Args {
    pub fn target(&self) -> Target {
        match (&self.destination_training_key, self.export) {
            (Some(key), false) => Target::Remote {
                training_key: key.clone(),
                endpoint: self.destination_endpoint.clone(),
            },
            _ => Target::Export {
                dir: self.export_dir.clone(),
                include_background: self.include_background,
            },
        }
    }
}
