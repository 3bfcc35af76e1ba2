use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use spdlog::{debug, warn};

use crate::error::MediaError;

/// Sub folder of the repository holding one json descriptor per media file.
pub const MEDIA_DIR: &str = "media";

/// Example of descriptor
/// { "path": "media/2014/01/diagram.png", "exists": true }
#[derive(Debug, Deserialize)]
struct MediaDescriptor {
    /// Relative to the repository folder
    path: PathBuf,
    #[serde(default = "default_exists")]
    exists: bool,
}

fn default_exists() -> bool {
    true
}

/// Maps the public name of uploaded media (its basename) to the file path
/// relative to the repository folder.
///
/// Unlike posts, a broken descriptor is not skipped: a descriptor pointing at a
/// file that is not there fails the whole load.
#[derive(Debug, Default)]
pub struct MediaIndex {
    paths: HashMap<String, PathBuf>,
}

impl MediaIndex {
    pub fn load(folder: &Path) -> Result<MediaIndex, MediaError> {
        let media_dir = folder.join(MEDIA_DIR);
        let mut index = MediaIndex::default();
        if !media_dir.is_dir() {
            debug!("No media folder in {}", folder.display());
            return Ok(index);
        }

        let entries = fs::read_dir(&media_dir).map_err(|source| MediaError::Io {
            path: media_dir.clone(),
            source,
        })?;

        let mut descriptors: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        descriptors.sort();

        for descriptor_path in descriptors {
            index.add_descriptor(folder, &descriptor_path)?;
        }

        debug!("Loaded {} media files from {}", index.len(), media_dir.display());
        Ok(index)
    }

    fn add_descriptor(&mut self, folder: &Path, descriptor_path: &Path) -> Result<(), MediaError> {
        let raw = fs::read_to_string(descriptor_path).map_err(|source| MediaError::Io {
            path: descriptor_path.to_path_buf(),
            source,
        })?;
        let descriptor: MediaDescriptor = serde_json::from_str(&raw).map_err(|source| MediaError::Descriptor {
            path: descriptor_path.to_path_buf(),
            source,
        })?;

        if !descriptor.exists {
            debug!("Skipping media descriptor {}, marked as not existing", descriptor_path.display());
            return Ok(());
        }

        let target = folder.join(&descriptor.path);
        if !target.is_file() {
            return Err(MediaError::MissingTarget {
                descriptor: descriptor_path.to_path_buf(),
                target,
            });
        }

        let Some(name) = descriptor.path.file_name().and_then(|n| n.to_str()) else {
            warn!("Media descriptor {} has no file name in its path", descriptor_path.display());
            return Ok(());
        };

        if self.paths.contains_key(name) {
            warn!("Media name {} is used more than once, keeping the first one. descriptor={}",
                name, descriptor_path.display());
            return Ok(());
        }
        self.paths.insert(name.to_string(), descriptor.path);
        Ok(())
    }

    /// Path relative to the repository folder for a requested media name.
    /// Only the basename of the request matters, so `2014/01/a.png` finds `a.png`.
    pub fn get_media_path(&self, name: &str) -> Option<&Path> {
        let name = Path::new(name).file_name()?.to_str()?;
        self.paths.get(name).map(|p| p.as_path())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
