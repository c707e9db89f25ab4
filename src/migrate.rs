//! Run orchestration: project, then tags, then images.

use log::info;
use std::path::PathBuf;

use crate::client::TrainingApi;
use crate::error::Result;
use crate::fetch::ImageDownloader;
use crate::images::migrate_images;
use crate::project::migrate_project;
use crate::tags::migrate_tags;
use crate::types::MigrationStats;
use crate::utils::ensure_export_directory;

/// Local Pascal VOC export settings
pub struct ExportTarget<'a> {
    pub dir: PathBuf,
    pub downloader: &'a dyn ImageDownloader,
    pub include_background: bool,
}

/// Where tags and images are written
pub enum Destination<'a> {
    Remote {
        client: &'a dyn TrainingApi,
        project_id: String,
    },
    Export(ExportTarget<'a>),
}

/// What the caller asked for, before any destination project exists
pub enum Mode<'a> {
    Migrate(&'a dyn TrainingApi),
    Export(ExportTarget<'a>),
}

/// Migrate or export `project_id` from `source`.
///
/// Any failure aborts the run; entities already created at the destination are left in place.
pub fn run_migration(
    source: &dyn TrainingApi,
    project_id: &str,
    mode: Mode<'_>,
) -> Result<MigrationStats> {
    info!("Collecting information for source project: {}", project_id);

    let destination = match mode {
        Mode::Migrate(client) => {
            let dest_project = migrate_project(source, client, project_id)?;
            Destination::Remote {
                client,
                project_id: dest_project.id,
            }
        }
        Mode::Export(target) => {
            ensure_export_directory(&target.dir)?;
            Destination::Export(target)
        }
    };

    let tags = migrate_tags(source, project_id, &destination)?;
    let mut stats = MigrationStats {
        tags: tags.len(),
        ..MigrationStats::default()
    };
    migrate_images(source, project_id, &destination, &tags, &mut stats)?;
    Ok(stats)
}
