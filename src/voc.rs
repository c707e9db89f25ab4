//! Pascal VOC annotation writer
//!
//! Converts an image's normalized regions into absolute pixel boxes and
//! renders them as a Pascal VOC XML document, indented with three spaces.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::{Region, TagMapping};

const INDENT: &str = "   ";
const DATABASE: &str = "Custom Vision";
const IMAGE_DEPTH: u32 = 3;

/// Absolute pixel bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

/// Scale a normalized region to pixels, flooring each edge and keeping it inside the image
pub fn calculate_bounding_box(region: &Region, image_width: u32, image_height: u32) -> BoundingBox {
    let scale = |value: f64, extent: u32| -> u32 {
        let pixels = (value * extent as f64).floor();
        (pixels.max(0.0) as u32).min(extent)
    };

    BoundingBox {
        xmin: scale(region.left, image_width),
        xmax: scale(region.left + region.width, image_width),
        ymin: scale(region.top, image_height),
        ymax: scale(region.top + region.height, image_height),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VocObject {
    pub name: String,
    pub bndbox: BoundingBox,
}

/// One annotation document
#[derive(Debug, Clone, PartialEq)]
pub struct VocAnnotation {
    pub folder: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub objects: Vec<VocObject>,
}

impl VocAnnotation {
    /// Build an annotation from the image's regions, naming each object through `tags`
    pub fn from_regions(
        folder: &str,
        filename: &str,
        (width, height): (u32, u32),
        regions: &[Region],
        tags: &TagMapping,
    ) -> Result<Self> {
        let objects = regions
            .iter()
            .map(|region| {
                Ok(VocObject {
                    name: tags.resolve(&region.tag_id)?.to_string(),
                    bndbox: calculate_bounding_box(region, width, height),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            folder: folder.to_string(),
            filename: filename.to_string(),
            width,
            height,
            objects,
        })
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(512 + self.objects.len() * 384);
        xml.push_str("<?xml version=\"1.0\" ?>\n<annotation>\n");
        push_element(&mut xml, 1, "folder", &self.folder);
        push_element(&mut xml, 1, "filename", &self.filename);
        push_element(&mut xml, 1, "path", &self.filename);

        open_element(&mut xml, 1, "source");
        push_element(&mut xml, 2, "database", DATABASE);
        close_element(&mut xml, 1, "source");

        open_element(&mut xml, 1, "size");
        push_element(&mut xml, 2, "width", &self.width.to_string());
        push_element(&mut xml, 2, "height", &self.height.to_string());
        push_element(&mut xml, 2, "depth", &IMAGE_DEPTH.to_string());
        close_element(&mut xml, 1, "size");
        push_element(&mut xml, 1, "segmented", "0");

        for object in &self.objects {
            open_element(&mut xml, 1, "object");
            push_element(&mut xml, 2, "name", &object.name);
            push_element(&mut xml, 2, "pose", "Unspecified");
            push_element(&mut xml, 2, "truncated", "0");
            push_element(&mut xml, 2, "difficult", "0");
            push_element(&mut xml, 2, "occluded", "0");
            open_element(&mut xml, 2, "bndbox");
            push_element(&mut xml, 3, "xmin", &object.bndbox.xmin.to_string());
            push_element(&mut xml, 3, "xmax", &object.bndbox.xmax.to_string());
            push_element(&mut xml, 3, "ymin", &object.bndbox.ymin.to_string());
            push_element(&mut xml, 3, "ymax", &object.bndbox.ymax.to_string());
            close_element(&mut xml, 2, "bndbox");
            close_element(&mut xml, 1, "object");
        }

        xml.push_str("</annotation>\n");
        xml
    }
}

/// Write the annotation as UTF-8, replacing any existing file
pub fn write_annotation(path: &Path, annotation: &VocAnnotation) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(annotation.to_xml().as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn push_indent(xml: &mut String, depth: usize) {
    for _ in 0..depth {
        xml.push_str(INDENT);
    }
}

fn open_element(xml: &mut String, depth: usize, tag: &str) {
    push_indent(xml, depth);
    xml.push_str(&format!("<{}>\n", tag));
}

fn close_element(xml: &mut String, depth: usize, tag: &str) {
    push_indent(xml, depth);
    xml.push_str(&format!("</{}>\n", tag));
}

fn push_element(xml: &mut String, depth: usize, tag: &str, text: &str) {
    push_indent(xml, depth);
    if text.is_empty() {
        xml.push_str(&format!("<{}/>\n", tag));
    } else {
        xml.push_str(&format!("<{0}>{1}</{0}>\n", tag, escape_text(text)));
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
