use log::info;

use crate::client::TrainingApi;
use crate::error::Result;
use crate::types::{NewProject, Project};

/// Create a destination project with the source project's name, description and settings
pub fn migrate_project(
    source: &dyn TrainingApi,
    destination: &dyn TrainingApi,
    project_id: &str,
) -> Result<Project> {
    let src_project = source.get_project(project_id)?;
    info!("Source project: {}", src_project.name);
    info!(
        "\tDescription: {}",
        src_project.description.as_deref().unwrap_or_default()
    );
    info!("\tDomain: {}", src_project.settings.domain_id);
    if let Some(classification_type) = &src_project.settings.classification_type {
        info!("\tClassificationType: {}", classification_type);
    }
    info!(
        "\tTarget Export Platforms: {:?}",
        src_project.settings.target_export_platforms
    );

    let dest_project = destination.create_project(&NewProject::from(&src_project))?;
    info!("Created destination project: {} {}", dest_project.name, dest_project.id);
    Ok(dest_project)
}
