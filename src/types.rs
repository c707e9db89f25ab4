use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{MigrateError, Result};

// Batch statuses the service reports for images it accepted
const SUCCESS_STATUSES: &[&str] = &["OK", "OKDuplicate"];

/// A Custom Vision project as returned by the training API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub settings: ProjectSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub domain_id: String,
    #[serde(default)]
    pub classification_type: Option<String>,
    #[serde(default)]
    pub target_export_platforms: Vec<String>,
}

/// Parameters for creating a project at the destination
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub domain_id: String,
    pub classification_type: Option<String>,
    pub target_export_platforms: Vec<String>,
}

impl From<&Project> for NewProject {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            domain_id: project.settings.domain_id.clone(),
            classification_type: project.settings.classification_type.clone(),
            target_export_platforms: project.settings.target_export_platforms.clone(),
        }
    }
}

fn default_tag_type() -> String {
    "Regular".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default = "default_tag_type")]
    pub tag_type: String,
}

/// A normalized bounding box attached to an image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(default)]
    pub region_id: Option<String>,
    pub tag_id: String,
    #[serde(default)]
    pub tag_name: Option<String>,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A whole-image tag association
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageTag {
    pub tag_id: String,
    #[serde(default)]
    pub tag_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub original_image_uri: String,
    #[serde(default)]
    pub regions: Option<Vec<Region>>,
    #[serde(default)]
    pub tags: Option<Vec<ImageTag>>,
}

/// How an image is labeled. Regions win over whole-image tags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageLabels<'a> {
    TaggedByRegion(&'a [Region]),
    TaggedByClass(&'a [ImageTag]),
    Untagged,
}

impl Image {
    /// The raw region list, empty when the image has none
    pub fn regions(&self) -> &[Region] {
        self.regions.as_deref().unwrap_or_default()
    }

    pub fn labels(&self) -> ImageLabels<'_> {
        match (self.regions.as_deref(), self.tags.as_deref()) {
            (Some(regions), _) if !regions.is_empty() => ImageLabels::TaggedByRegion(regions),
            (_, Some(tags)) if !tags.is_empty() => ImageLabels::TaggedByClass(tags),
            _ => ImageLabels::Untagged,
        }
    }
}

/// A region in an upload entry, referencing a destination tag
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewRegion {
    pub tag_id: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Labels carried by an upload entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryLabels {
    Regions(Vec<NewRegion>),
    TagIds(Vec<String>),
    None,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrlCreateEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<NewRegion>>,
}

impl ImageUrlCreateEntry {
    pub fn new(url: impl Into<String>, labels: EntryLabels) -> Self {
        let (tag_ids, regions) = match labels {
            EntryLabels::Regions(regions) => (None, Some(regions)),
            EntryLabels::TagIds(tag_ids) => (Some(tag_ids), None),
            EntryLabels::None => (None, None),
        };
        Self {
            url: url.into(),
            tag_ids,
            regions,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageUrlCreateBatch {
    pub images: Vec<ImageUrlCreateEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreatedImage {
    pub id: String,
}

/// Per-image outcome of a batch upload
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageCreateResult {
    #[serde(default)]
    pub source_url: Option<String>,
    pub status: String,
    #[serde(default)]
    pub image: Option<CreatedImage>,
}

impl ImageCreateResult {
    pub fn is_success(&self) -> bool {
        SUCCESS_STATUSES.contains(&self.status.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageCreateSummary {
    pub is_batch_successful: bool,
    #[serde(default)]
    pub images: Vec<ImageCreateResult>,
}

/// Source tag id to destination tag id (online) or tag name (export)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TagMapping(BTreeMap<String, String>);

impl TagMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source_id: impl Into<String>, target: impl Into<String>) {
        self.0.insert(source_id.into(), target.into());
    }

    pub fn resolve(&self, source_id: &str) -> Result<&str> {
        self.0
            .get(source_id)
            .map(String::as_str)
            .ok_or_else(|| MigrateError::UnknownTag(source_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for TagMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// Counters reported at the end of a run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MigrationStats {
    pub tags: usize,
    pub tagged_images: usize,
    pub untagged_images: usize,
    pub skipped_untagged: usize,
}

impl MigrationStats {
    pub fn print_summary(&self) {
        log::info!("=== Migration Summary ===");
        log::info!("Tags: {}", self.tags);
        log::info!("Tagged images: {}", self.tagged_images);
        log::info!("Untagged images: {}", self.untagged_images);
        if self.skipped_untagged > 0 {
            log::warn!(
                "Skipped untagged images: {} (pass --include_background to export them)",
                self.skipped_untagged
            );
        }
    }
}
