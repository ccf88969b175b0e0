use crate::config::DatasetConfig;
use anyhow::{Context, Result};
use glob::{glob_with, MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One user directory that holds a trajectory subdirectory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    /// Directory name, used verbatim as the user id
    pub id: String,
    pub trajectory_dir: PathBuf,
}

/// Handles traversal of the `root/<owner>/<trajectory_dir>/*.<ext>` layout
pub struct FileDiscovery {
    trajectory_dir: String,
    extension: String,
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new(&DatasetConfig::default())
    }
}

impl FileDiscovery {
    pub fn new(dataset: &DatasetConfig) -> Self {
        Self {
            trajectory_dir: dataset.trajectory_dir.clone(),
            extension: dataset.file_extension.trim_start_matches('.').to_string(),
        }
    }

    /// Discover owners under the root, sorted by directory name
    pub fn discover_owners(&self, root: &Path) -> Result<Vec<Owner>> {
        let entries = fs::read_dir(root)
            .with_context(|| format!("Failed to list root directory: {}", root.display()))?;

        let mut owners = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read entry in {}", root.display()))?;
            let owner_path = entry.path();
            if !owner_path.is_dir() {
                continue;
            }

            let trajectory_dir = owner_path.join(&self.trajectory_dir);
            if !trajectory_dir.is_dir() {
                debug!(path = %owner_path.display(), "Skipping directory without trajectories");
                continue;
            }

            owners.push(Owner {
                id: entry.file_name().to_string_lossy().into_owned(),
                trajectory_dir,
            });
        }

        owners.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(owners)
    }

    /// Find trajectory files of one owner, matching the extension case-insensitively
    pub fn trajectory_files(&self, owner: &Owner) -> Result<Vec<PathBuf>> {
        let base = Pattern::escape(&owner.trajectory_dir.to_string_lossy());
        let pattern = format!("{}/*.{}", base, Pattern::escape(&self.extension));
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let paths = glob_with(&pattern, options)
            .with_context(|| format!("Invalid trajectory pattern: {}", pattern))?;

        let mut files = Vec::new();
        for entry in paths {
            let path = entry.with_context(|| {
                format!(
                    "Failed to read trajectory directory: {}",
                    owner.trajectory_dir.display()
                )
            })?;
            files.push(path);
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}
