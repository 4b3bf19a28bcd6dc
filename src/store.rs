//! JSON file storage for the image list and password map

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::registry::ImageRegistry;
use crate::Result;

pub const IMAGES_FILE: &str = "images.json";
pub const PASSWORDS_FILE: &str = "passwords.json";

/// Image list and password map stored as two JSON files
#[derive(Debug, Clone)]
pub struct ImageStore {
    images_path: PathBuf,
    passwords_path: PathBuf,
}

impl ImageStore {
    pub fn new(images_path: impl Into<PathBuf>, passwords_path: impl Into<PathBuf>) -> Self {
        Self {
            images_path: images_path.into(),
            passwords_path: passwords_path.into(),
        }
    }

    /// Store using the default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(IMAGES_FILE), dir.join(PASSWORDS_FILE))
    }

    pub fn images_path(&self) -> &Path {
        &self.images_path
    }

    pub fn passwords_path(&self) -> &Path {
        &self.passwords_path
    }

    /// Load the registry. Missing files are treated as empty.
    pub fn load(&self) -> Result<ImageRegistry> {
        let images = read_or_empty(&self.images_path)?;
        let passwords = read_or_empty(&self.passwords_path)?;
        let registry = ImageRegistry::from_json(&images, &passwords)?;
        tracing::info!(path = ?self.images_path, images = registry.len(), "Image store loaded");
        Ok(registry)
    }

    /// Save both files.
    ///
    /// Each file is written to a temporary file next to it and renamed into
    /// place. Both are written before either is renamed, so a failed write
    /// leaves the files on disk untouched.
    pub fn save(&self, registry: &ImageRegistry) -> Result<()> {
        let images = stage(&self.images_path, &registry.images_json()?)?;
        let passwords = stage(&self.passwords_path, &registry.passwords_json()?)?;

        images.persist(&self.images_path).map_err(|e| e.error)?;
        passwords.persist(&self.passwords_path).map_err(|e| e.error)?;
        tracing::info!(path = ?self.images_path, images = registry.len(), "Image store saved");
        Ok(())
    }
}

fn read_or_empty(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = ?path, "File not found, starting empty");
            Ok(String::new())
        }
        Err(e) => Err(e.into()),
    }
}

fn stage(path: &Path, contents: &str) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    Ok(file)
}
