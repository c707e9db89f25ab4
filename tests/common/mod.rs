#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io::Cursor;

use cvmigrate::types::{
    CreatedImage, ImageCreateResult, ImageCreateSummary, ImageTag, ImageUrlCreateBatch,
    NewProject, ProjectSettings,
};
use cvmigrate::{Image, ImageDownloader, Project, Region, Result, Tag, TrainingApi};

/// In-memory training service recording every call that matters to the tests
pub struct FakeService {
    pub project: Project,
    pub tags: Vec<Tag>,
    pub tagged: Vec<Image>,
    pub untagged: Vec<Image>,
    pub fail_batch: Option<usize>,
    pub failing_status: &'static str,
    pub failing_status_for_all: bool,
    pub created_projects: RefCell<Vec<NewProject>>,
    pub created_tags: RefCell<Vec<(String, Tag)>>,
    pub batches: RefCell<Vec<(String, ImageUrlCreateBatch)>>,
    pub page_requests: RefCell<Vec<(&'static str, usize, usize)>>,
    pub untagged_count_queried: Cell<bool>,
}

impl FakeService {
    pub fn new(tags: Vec<Tag>, tagged: Vec<Image>, untagged: Vec<Image>) -> Self {
        Self {
            project: Project {
                id: "P1".to_string(),
                name: "Birds".to_string(),
                description: Some("Bird detector".to_string()),
                settings: ProjectSettings {
                    domain_id: "da2e3a8a-40a5-4171-82f4-58522f70fbc1".to_string(),
                    classification_type: None,
                    target_export_platforms: vec!["CoreML".to_string(), "TensorFlow".to_string()],
                },
            },
            tags,
            tagged,
            untagged,
            fail_batch: None,
            failing_status: "ErrorSource",
            failing_status_for_all: false,
            created_projects: RefCell::new(Vec::new()),
            created_tags: RefCell::new(Vec::new()),
            batches: RefCell::new(Vec::new()),
            page_requests: RefCell::new(Vec::new()),
            untagged_count_queried: Cell::new(false),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }
}

fn page(images: &[Image], take: usize, skip: usize) -> Vec<Image> {
    images.iter().skip(skip).take(take).cloned().collect()
}

impl TrainingApi for FakeService {
    fn get_project(&self, _project_id: &str) -> Result<Project> {
        Ok(self.project.clone())
    }

    fn create_project(&self, project: &NewProject) -> Result<Project> {
        self.created_projects.borrow_mut().push(project.clone());
        Ok(Project {
            id: "DEST".to_string(),
            name: project.name.clone(),
            description: project.description.clone(),
            settings: ProjectSettings {
                domain_id: project.domain_id.clone(),
                classification_type: project.classification_type.clone(),
                target_export_platforms: project.target_export_platforms.clone(),
            },
        })
    }

    fn get_tags(&self, _project_id: &str) -> Result<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    fn create_tag(
        &self,
        project_id: &str,
        name: &str,
        description: Option<&str>,
        tag_type: &str,
    ) -> Result<Tag> {
        let tag = Tag {
            id: format!("new-{}", name),
            name: name.to_string(),
            description: description.map(str::to_string),
            tag_type: tag_type.to_string(),
        };
        self.created_tags
            .borrow_mut()
            .push((project_id.to_string(), tag.clone()));
        Ok(tag)
    }

    fn get_tagged_image_count(&self, _project_id: &str) -> Result<usize> {
        Ok(self.tagged.len())
    }

    fn get_tagged_images(&self, _project_id: &str, take: usize, skip: usize) -> Result<Vec<Image>> {
        self.page_requests.borrow_mut().push(("tagged", skip, take));
        Ok(page(&self.tagged, take, skip))
    }

    fn get_untagged_image_count(&self, _project_id: &str) -> Result<usize> {
        self.untagged_count_queried.set(true);
        Ok(self.untagged.len())
    }

    fn get_untagged_images(
        &self,
        _project_id: &str,
        take: usize,
        skip: usize,
    ) -> Result<Vec<Image>> {
        self.page_requests.borrow_mut().push(("untagged", skip, take));
        Ok(page(&self.untagged, take, skip))
    }

    fn create_images_from_urls(
        &self,
        project_id: &str,
        batch: &ImageUrlCreateBatch,
    ) -> Result<ImageCreateSummary> {
        let index = self.batches.borrow().len();
        self.batches
            .borrow_mut()
            .push((project_id.to_string(), batch.clone()));
        let failing = self.fail_batch == Some(index);

        let images = batch
            .images
            .iter()
            .enumerate()
            .map(|(i, entry)| ImageCreateResult {
                source_url: Some(entry.url.clone()),
                status: if failing && (i == 0 || self.failing_status_for_all) {
                    self.failing_status.to_string()
                } else {
                    "OK".to_string()
                },
                image: Some(CreatedImage {
                    id: format!("created-{}-{}", index, i),
                }),
            })
            .collect();
        Ok(ImageCreateSummary {
            is_batch_successful: !failing,
            images,
        })
    }
}

/// Serves a generated PNG of a fixed size and counts downloads
pub struct CountingDownloader {
    pub width: u32,
    pub height: u32,
    pub calls: Cell<usize>,
}

impl CountingDownloader {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Cell::new(0),
        }
    }
}

impl ImageDownloader for CountingDownloader {
    fn download(&self, _url: &str) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        Ok(png_bytes(self.width, self.height))
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Vec::new();
    image::DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

pub fn tag(id: &str, name: &str) -> Tag {
    Tag {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(format!("{} tag", name)),
        tag_type: "Regular".to_string(),
    }
}

pub fn region(tag_id: &str, left: f64, top: f64, width: f64, height: f64) -> Region {
    Region {
        region_id: None,
        tag_id: tag_id.to_string(),
        tag_name: None,
        left,
        top,
        width,
        height,
    }
}

pub fn region_image(id: &str, regions: Vec<Region>) -> Image {
    Image {
        id: id.to_string(),
        original_image_uri: format!("https://images.example.com/{}.jpg", id),
        regions: Some(regions),
        tags: None,
    }
}

pub fn class_image(id: &str, tag_ids: &[&str]) -> Image {
    Image {
        id: id.to_string(),
        original_image_uri: format!("https://images.example.com/{}.jpg", id),
        regions: None,
        tags: Some(
            tag_ids
                .iter()
                .map(|tag_id| ImageTag {
                    tag_id: tag_id.to_string(),
                    tag_name: None,
                })
                .collect(),
        ),
    }
}

pub fn untagged_image(id: &str) -> Image {
    Image {
        id: id.to_string(),
        original_image_uri: format!("https://images.example.com/{}.jpg", id),
        regions: None,
        tags: None,
    }
}
