use image::ImageReader;
use log::debug;
use reqwest::blocking::Client;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::client::check_status;
use crate::error::Result;

/// Source of raw image bytes
pub trait ImageDownloader {
    fn download(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpDownloader {
    http: Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: Client::builder().build()?,
        })
    }
}

impl ImageDownloader for HttpDownloader {
    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = check_status(self.http.get(url).send()?)?;
        Ok(response.bytes()?.to_vec())
    }
}

/// Return the pixel size of the image cached at `path`, downloading it from
/// `url` first when the file does not exist yet.
pub fn fetch_image_dimensions(
    downloader: &dyn ImageDownloader,
    url: &str,
    path: &Path,
) -> Result<(u32, u32)> {
    if path.exists() {
        debug!("Using cached image {}", path.display());
    } else {
        let bytes = downloader.download(url)?;
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        file.flush()?;
    }
    read_image_dimensions(path)
}

/// Read width and height without decoding pixel data
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32)> {
    Ok(ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?)
}
