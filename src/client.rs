//! Custom Vision training API access
//!
//! The pipeline only talks to the service through [`TrainingApi`], which
//! [`CustomVisionClient`] implements over the v3.3 REST API.

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::{MigrateError, Result};
use crate::types::{
    Image, ImageCreateSummary, ImageUrlCreateBatch, NewProject, Project, Tag,
};

const API_PATH: &str = "customvision/v3.3/training";

/// Operations the migration needs from a training service
pub trait TrainingApi {
    fn get_project(&self, project_id: &str) -> Result<Project>;

    fn create_project(&self, project: &NewProject) -> Result<Project>;

    fn get_tags(&self, project_id: &str) -> Result<Vec<Tag>>;

    fn create_tag(
        &self,
        project_id: &str,
        name: &str,
        description: Option<&str>,
        tag_type: &str,
    ) -> Result<Tag>;

    fn get_tagged_image_count(&self, project_id: &str) -> Result<usize>;

    fn get_tagged_images(&self, project_id: &str, take: usize, skip: usize) -> Result<Vec<Image>>;

    fn get_untagged_image_count(&self, project_id: &str) -> Result<usize>;

    fn get_untagged_images(&self, project_id: &str, take: usize, skip: usize)
        -> Result<Vec<Image>>;

    fn create_images_from_urls(
        &self,
        project_id: &str,
        batch: &ImageUrlCreateBatch,
    ) -> Result<ImageCreateSummary>;
}

/// Blocking client for one Custom Vision training resource
pub struct CustomVisionClient {
    http: Client,
    base_url: String,
    training_key: String,
}

impl CustomVisionClient {
    pub fn new(training_key: &str, endpoint: &str) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: format!("{}/{}", endpoint.trim_end_matches('/'), API_PATH),
            training_key: training_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(self.url(path))
            .header("Training-Key", &self.training_key)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(self.url(path))
            .header("Training-Key", &self.training_key)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_status(request.send()?)?;
        Ok(response.json()?)
    }
}

// Turn a non-2xx response into an API error carrying the body
pub(crate) fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().unwrap_or_default();
    Err(MigrateError::Api {
        status: status.as_u16(),
        message,
    })
}

impl TrainingApi for CustomVisionClient {
    fn get_project(&self, project_id: &str) -> Result<Project> {
        self.send(self.get(&format!("projects/{}", project_id)))
    }

    fn create_project(&self, project: &NewProject) -> Result<Project> {
        let mut query: Vec<(&str, String)> = vec![
            ("name", project.name.clone()),
            ("domainId", project.domain_id.clone()),
        ];
        if let Some(description) = &project.description {
            query.push(("description", description.clone()));
        }
        if let Some(classification_type) = &project.classification_type {
            query.push(("classificationType", classification_type.clone()));
        }
        if !project.target_export_platforms.is_empty() {
            query.push((
                "targetExportPlatforms",
                project.target_export_platforms.join(","),
            ));
        }
        debug!("Creating project with {:?}", query);
        self.send(self.post("projects").query(&query))
    }

    fn get_tags(&self, project_id: &str) -> Result<Vec<Tag>> {
        self.send(self.get(&format!("projects/{}/tags", project_id)))
    }

    fn create_tag(
        &self,
        project_id: &str,
        name: &str,
        description: Option<&str>,
        tag_type: &str,
    ) -> Result<Tag> {
        let mut query = vec![("name", name), ("type", tag_type)];
        if let Some(description) = description {
            query.push(("description", description));
        }
        self.send(self.post(&format!("projects/{}/tags", project_id)).query(&query))
    }

    fn get_tagged_image_count(&self, project_id: &str) -> Result<usize> {
        self.send(self.get(&format!("projects/{}/images/tagged/count", project_id)))
    }

    fn get_tagged_images(&self, project_id: &str, take: usize, skip: usize) -> Result<Vec<Image>> {
        self.send(
            self.get(&format!("projects/{}/images/tagged", project_id))
                .query(&[("take", take), ("skip", skip)]),
        )
    }

    fn get_untagged_image_count(&self, project_id: &str) -> Result<usize> {
        self.send(self.get(&format!("projects/{}/images/untagged/count", project_id)))
    }

    fn get_untagged_images(
        &self,
        project_id: &str,
        take: usize,
        skip: usize,
    ) -> Result<Vec<Image>> {
        self.send(
            self.get(&format!("projects/{}/images/untagged", project_id))
                .query(&[("take", take), ("skip", skip)]),
        )
    }

    fn create_images_from_urls(
        &self,
        project_id: &str,
        batch: &ImageUrlCreateBatch,
    ) -> Result<ImageCreateSummary> {
        self.send(
            self.post(&format!("projects/{}/images/urls", project_id))
                .json(batch),
        )
    }
}
