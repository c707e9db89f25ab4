//! Image migration
//!
//! Tagged images are paged first, then untagged ones, each in windows of at
//! most [`MAX_PAGE_SIZE`]. Remote destinations receive one batch upload per
//! page and the run stops at the first batch the service does not fully
//! accept. Export destinations get an image file and a Pascal VOC annotation
//! per tagged image.

use log::{debug, error, info};

use crate::client::TrainingApi;
use crate::error::{MigrateError, Result};
use crate::fetch::fetch_image_dimensions;
use crate::migrate::{Destination, ExportTarget};
use crate::types::{
    EntryLabels, Image, ImageLabels, ImageUrlCreateBatch, ImageUrlCreateEntry, MigrationStats,
    NewRegion, TagMapping,
};
use crate::utils::{artifact_stem, create_progress_bar, folder_name};
use crate::voc::{write_annotation, VocAnnotation};

/// Largest page the training API returns
pub const MAX_PAGE_SIZE: usize = 50;

/// `(skip, take)` windows covering `total` items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindows {
    remaining: usize,
    skip: usize,
    page_size: usize,
}

impl PageWindows {
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            remaining: total,
            skip: 0,
            page_size: page_size.max(1),
        }
    }
}

impl Iterator for PageWindows {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let take = self.remaining.min(self.page_size);
        let window = (self.skip, take);
        self.skip += take;
        self.remaining -= take;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pages = self.remaining.div_ceil(self.page_size);
        (pages, Some(pages))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Tagged,
    Untagged,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::Tagged => "tagged",
            Phase::Untagged => "untagged",
        }
    }
}

/// An upload entry plus the mapped tag references used to name exported files
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedImage {
    pub entry: ImageUrlCreateEntry,
    pub tag_refs: Vec<String>,
}

/// Resolve an image's regions or whole-image tags through the mapping
pub fn prepare_image(image: &Image, tags: &TagMapping) -> Result<PreparedImage> {
    let url = image.original_image_uri.as_str();
    match image.labels() {
        ImageLabels::TaggedByRegion(regions) => {
            let mut new_regions = Vec::with_capacity(regions.len());
            let mut tag_refs = Vec::with_capacity(regions.len());
            for region in regions {
                debug!(
                    "Found region: {:?} {} {} {} {} {}",
                    region.region_id,
                    region.tag_id,
                    region.left,
                    region.top,
                    region.width,
                    region.height
                );
                let tag = tags.resolve(&region.tag_id)?;
                new_regions.push(NewRegion {
                    tag_id: tag.to_string(),
                    left: region.left,
                    top: region.top,
                    width: region.width,
                    height: region.height,
                });
                tag_refs.push(tag.to_string());
            }
            Ok(PreparedImage {
                entry: ImageUrlCreateEntry::new(url, EntryLabels::Regions(new_regions)),
                tag_refs,
            })
        }
        ImageLabels::TaggedByClass(image_tags) => {
            let tag_refs = image_tags
                .iter()
                .map(|tag| {
                    debug!("Found tag: {:?} {}", tag.tag_name, tag.tag_id);
                    tags.resolve(&tag.tag_id).map(str::to_string)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(PreparedImage {
                entry: ImageUrlCreateEntry::new(url, EntryLabels::TagIds(tag_refs.clone())),
                tag_refs,
            })
        }
        ImageLabels::Untagged => Ok(PreparedImage {
            entry: ImageUrlCreateEntry::new(url, EntryLabels::None),
            tag_refs: Vec::new(),
        }),
    }
}

/// Ensure the image file and its annotation exist in the export directory.
///
/// The image is only downloaded when missing; the annotation is always rewritten
/// from the image's own region list.
pub fn export_image(
    target: &ExportTarget<'_>,
    image: &Image,
    tag_refs: &[String],
    tags: &TagMapping,
) -> Result<()> {
    let refs: Vec<&str> = tag_refs.iter().map(String::as_str).collect();
    let stem = artifact_stem(&image.id, &refs);
    let image_file = format!("{}.jpg", stem);
    let xml_file = format!("{}.xml", stem);

    let dimensions = fetch_image_dimensions(
        target.downloader,
        &image.original_image_uri,
        &target.dir.join(&image_file),
    )?;
    let annotation = VocAnnotation::from_regions(
        &folder_name(&target.dir),
        &image_file,
        dimensions,
        image.regions(),
        tags,
    )?;
    write_annotation(&target.dir.join(xml_file), &annotation)
}

/// Migrate tagged then untagged images of `project_id` to `destination`
pub fn migrate_images(
    source: &dyn TrainingApi,
    project_id: &str,
    destination: &Destination<'_>,
    tags: &TagMapping,
    stats: &mut MigrationStats,
) -> Result<()> {
    migrate_tagged_images(source, project_id, destination, tags, stats)?;
    migrate_untagged_images(source, project_id, destination, tags, stats)
}

fn migrate_tagged_images(
    source: &dyn TrainingApi,
    project_id: &str,
    destination: &Destination<'_>,
    tags: &TagMapping,
    stats: &mut MigrationStats,
) -> Result<()> {
    let count = source.get_tagged_image_count(project_id)?;
    info!("Found: {} tagged images.", count);
    let pb = create_progress_bar(count as u64, "Tagged");

    for (skip, take) in PageWindows::new(count, MAX_PAGE_SIZE) {
        pb.suspend(|| info!("Getting {} images", take));
        let images = source.get_tagged_images(project_id, take, skip)?;
        let mut entries = Vec::with_capacity(images.len());
        for image in &images {
            debug!("Migrating {} {}", image.id, image.original_image_uri);
            let prepared = prepare_image(image, tags)?;
            if let Destination::Export(target) = destination {
                export_image(target, image, &prepared.tag_refs, tags)?;
            }
            entries.push(prepared.entry);
            pb.inc(1);
        }

        if let Destination::Remote {
            client,
            project_id: dest_project_id,
        } = destination
        {
            upload_batch(*client, dest_project_id, entries, Phase::Tagged)?;
        }
        stats.tagged_images += images.len();
    }

    pb.finish_with_message("Tagged images complete");
    Ok(())
}

fn migrate_untagged_images(
    source: &dyn TrainingApi,
    project_id: &str,
    destination: &Destination<'_>,
    tags: &TagMapping,
    stats: &mut MigrationStats,
) -> Result<()> {
    let count = source.get_untagged_image_count(project_id)?;
    info!("Found: {} untagged images.", count);
    if let Destination::Export(target) = destination {
        if !target.include_background {
            stats.skipped_untagged += count;
            return Ok(());
        }
    }
    let pb = create_progress_bar(count as u64, "Untagged");

    for (skip, take) in PageWindows::new(count, MAX_PAGE_SIZE) {
        pb.suspend(|| info!("Getting {} images", take));
        let images = source.get_untagged_images(project_id, take, skip)?;

        match destination {
            Destination::Remote {
                client,
                project_id: dest_project_id,
            } => {
                let entries = images
                    .iter()
                    .map(|image| {
                        debug!("Migrating {} {}", image.id, image.original_image_uri);
                        ImageUrlCreateEntry::new(&image.original_image_uri, EntryLabels::None)
                    })
                    .collect();
                upload_batch(*client, dest_project_id, entries, Phase::Untagged)?;
                stats.untagged_images += images.len();
            }
            Destination::Export(target) => {
                for image in &images {
                    debug!("Exporting {} {}", image.id, image.original_image_uri);
                    export_image(target, image, &[], tags)?;
                }
                stats.untagged_images += images.len();
            }
        }
        pb.inc(images.len() as u64);
    }

    pb.finish_with_message("Untagged images complete");
    Ok(())
}

fn upload_batch(
    client: &dyn TrainingApi,
    project_id: &str,
    entries: Vec<ImageUrlCreateEntry>,
    phase: Phase,
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let total = entries.len();
    let summary =
        client.create_images_from_urls(project_id, &ImageUrlCreateBatch { images: entries })?;
    if summary.is_batch_successful {
        return Ok(());
    }

    error!("Failed to upload {} image batch", phase.label());
    for result in &summary.images {
        let id = result
            .image
            .as_ref()
            .map(|image| image.id.as_str())
            .or(result.source_url.as_deref())
            .unwrap_or("<unknown>");
        error!("\tImage status: {} {}", id, result.status);
    }
    Err(MigrateError::BatchFailed {
        phase: phase.label(),
        total,
        results: summary.images,
    })
}
