//! Project scaffolding service
//!
//! Writes the scaffold file set of a [`Project`] to disk. Existing files are
//! overwritten without asking.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Datelike;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Project;
use crate::infrastructure::traits::FileSystem;

/// Service writing project scaffolds.
pub struct ScaffoldService {
    fs: Arc<dyn FileSystem>,
    year: i32,
}

impl ScaffoldService {
    /// Create a new scaffold service stamping the current year into licenses.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_year(fs, chrono::Local::now().year())
    }

    /// Create a scaffold service with a fixed copyright year.
    pub fn with_year(fs: Arc<dyn FileSystem>, year: i32) -> Self {
        Self { fs, year }
    }

    /// Write `content` to `relative` inside the project directory.
    ///
    /// Parent directories are created as needed.
    #[instrument(level = "debug", skip(self, project, content), fields(project = project.name()))]
    pub fn write(
        &self,
        project: &Project,
        relative: impl AsRef<Path> + std::fmt::Debug,
        content: &str,
    ) -> ApplicationResult<PathBuf> {
        let path = project.path(relative);
        self.fs
            .ensure_parent(&path)
            .map_err(|e| ApplicationError::io("create directory for", &path, e))?;
        if self.fs.exists(&path) {
            debug!("overwriting {}", path.display());
        }
        self.fs
            .write(&path, content)
            .map_err(|e| ApplicationError::io("write", &path, e))?;
        Ok(path)
    }

    /// Write the standard scaffold file set and return the written paths.
    #[instrument(level = "debug", skip(self, project), fields(project = project.name()))]
    pub fn create(&self, project: &Project) -> ApplicationResult<Vec<PathBuf>> {
        let directory = project.directory();
        if self.fs.exists(directory) && !self.fs.is_dir(directory) {
            return Err(ApplicationError::io(
                "create directory",
                directory,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "not a directory"),
            ));
        }
        self.fs
            .create_dir_all(project.directory())
            .map_err(|e| ApplicationError::io("create directory", project.directory(), e))?;

        let mut written = Vec::new();
        for (relative, content) in project.files(self.year) {
            written.push(self.write(project, relative, &content)?);
        }
        info!(
            "scaffolded {} ({}) into {}",
            project.name(),
            project.license(),
            project.directory().display()
        );
        Ok(written)
    }
}
