use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::client::TrainingApi;
use crate::error::Result;
use crate::migrate::Destination;
use crate::types::TagMapping;

pub const TAGS_FILE: &str = "tags.json";

/// Copy every source tag to the destination and return the source-to-destination mapping.
///
/// Remote destinations get a newly created tag per source tag and map to the new ids.
/// Export destinations map to tag names, which are also written to `tags.json`.
pub fn migrate_tags(
    source: &dyn TrainingApi,
    project_id: &str,
    destination: &Destination<'_>,
) -> Result<TagMapping> {
    let tags = source.get_tags(project_id)?;
    info!("Found: {} tags", tags.len());

    match destination {
        Destination::Remote {
            client,
            project_id: dest_project_id,
        } => {
            let mut mapping = TagMapping::new();
            for tag in &tags {
                info!("Creating tag: {} {}", tag.name, tag.id);
                let created = client.create_tag(
                    dest_project_id,
                    &tag.name,
                    tag.description.as_deref(),
                    &tag.tag_type,
                )?;
                mapping.insert(tag.id.clone(), created.id);
            }
            Ok(mapping)
        }
        Destination::Export(target) => {
            let mapping: TagMapping = tags.into_iter().map(|tag| (tag.id, tag.name)).collect();
            write_tag_mapping(&target.dir.join(TAGS_FILE), &mapping)?;
            Ok(mapping)
        }
    }
}

pub fn write_tag_mapping(path: &Path, mapping: &TagMapping) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, mapping)?;
    writer.flush()?;
    Ok(())
}
