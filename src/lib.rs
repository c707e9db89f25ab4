//! Custom Vision project migration
//!
//! This library copies a Custom Vision project (tags, images and regions) to
//! another training resource, or exports it as a Pascal VOC dataset.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod images;
pub mod migrate;
pub mod project;
pub mod tags;
pub mod types;
pub mod utils;
pub mod voc;

// Re-export commonly used types and functions
pub use client::{CustomVisionClient, TrainingApi};
pub use config::{Args, Target};
pub use error::{MigrateError, Result};
pub use fetch::{HttpDownloader, ImageDownloader};
pub use migrate::{run_migration, Destination, ExportTarget, Mode};
pub use types::{Image, MigrationStats, Project, Region, Tag, TagMapping};
