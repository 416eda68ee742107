//! Input discovery for batch runs.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lists the JPEG and PNG files directly inside `dir`, sorted by path.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read samples directory {}", dir.display()))?;
    let mut images = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Explicit inputs win; otherwise the samples directory is scanned.
/// An empty result is an error.
pub fn resolve_inputs(explicit: &[PathBuf], samples_dir: &Path) -> Result<Vec<PathBuf>> {
    let inputs = if explicit.is_empty() {
        discover_images(samples_dir)?
    } else {
        explicit.to_vec()
    };
    if inputs.is_empty() {
        bail!(
            "No input images found. Pass --input or put .jpg/.jpeg/.png files in {}",
            samples_dir.display()
        );
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PNG", "a.jpg", "c.jpeg", "notes.txt", "a.jpg.fragments.json"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let found: Vec<_> = discover_images(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found, ["a.jpg", "b.PNG", "c.jpeg"]);
    }

    #[test]
    fn test_explicit_inputs_skip_discovery() {
        let inputs = resolve_inputs(&[PathBuf::from("x.jpg")], Path::new("/does/not/exist")).unwrap();
        assert_eq!(inputs, [PathBuf::from("x.jpg")]);
    }

    #[test]
    fn test_empty_input_set_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_inputs(&[], dir.path()).unwrap_err();
        assert!(err.to_string().contains("No input images found"));
    }
}
