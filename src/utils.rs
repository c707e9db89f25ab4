use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Make sure the export directory exists, keeping anything already in it
pub fn ensure_export_directory(path: &Path) -> std::io::Result<PathBuf> {
    if path.exists() {
        log::info!("Reusing export directory {}", path.display());
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

// File names are limited to 255 bytes; leave room for ".jpg" / ".xml"
pub const MAX_STEM_BYTES: usize = 251;

/// File stem shared by an exported image and its annotation:
/// `<imageId>-<tag_tag_...>`, or just `<imageId>` for images without tags.
/// Long stems are cut to [`MAX_STEM_BYTES`] on a char boundary.
pub fn artifact_stem(image_id: &str, tags: &[&str]) -> String {
    let stem = if tags.is_empty() {
        image_id.to_string()
    } else {
        format!("{}-{}", image_id, tags.join("_"))
    };
    let mut stem = sanitize_filename::sanitize(stem);
    if stem.len() > MAX_STEM_BYTES {
        let mut end = MAX_STEM_BYTES;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem.truncate(end);
    }
    stem
}

/// Name recorded in the annotation's `<folder>` element
pub fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_stem_joins_tags() {
        assert_eq!(artifact_stem("I1", &["cat", "dog"]), "I1-cat_dog");
        assert_eq!(artifact_stem("I1", &[]), "I1");
        assert_eq!(artifact_stem("I1", &["a/b"]), "I1-ab");
    }

    #[test]
    fn test_artifact_stem_leaves_room_for_extension() {
        let tags = vec!["pedestrian"; 30];
        let stem = artifact_stem("I1", &tags);
        assert_eq!(stem.len(), MAX_STEM_BYTES);
        assert!(stem.starts_with("I1-pedestrian_pedestrian"));
        assert_eq!(stem, artifact_stem("I1", &tags));
    }

    #[test]
    fn test_artifact_stem_cuts_on_char_boundary() {
        let tags = vec!["café"; 60];
        let stem = artifact_stem("I1", &tags);
        assert!(stem.len() <= MAX_STEM_BYTES);
        assert!(format!("{}.jpg", stem).len() <= 255);
    }
}
