//! Project model and scaffold templates

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{DomainError, License};

/// Longest accepted project name.
pub const MAX_NAME_LEN: usize = 64;

pub const README: &str = "README.md";
pub const LICENSE: &str = "LICENSE";
pub const GITIGNORE: &str = ".gitignore";

/// A project to be scaffolded.
///
/// Name and license are validated in [`Project::new`]; a constructed
/// `Project` is always valid and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    license: License,
    directory: PathBuf,
    author: Option<String>,
}

fn name_regex() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap())
}

/// Whether `name` is usable as a project name.
pub fn is_valid_name(name: &str) -> bool {
    name.len() <= MAX_NAME_LEN && name_regex().is_match(name)
}

impl Project {
    pub fn new(
        name: &str,
        license: &str,
        directory: impl Into<PathBuf>,
    ) -> Result<Self, DomainError> {
        if !is_valid_name(name) {
            return Err(DomainError::InvalidProjectName(name.to_string()));
        }
        let license = license.parse::<License>()?;
        Ok(Self {
            name: name.to_string(),
            license,
            directory: directory.into(),
            author: None,
        })
    }

    /// Copyright holder for the LICENSE file; defaults to the project name.
    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn license(&self) -> License {
        self.license
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Resolve a scaffold-relative path inside the project directory.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.directory.join(relative)
    }

    pub fn readme(&self) -> String {
        let title = self.name.as_str();
        format!(
            "# {title}\n\
             \n\
             ## Installation\n\
             \n\
             ```bash\n\
             git clone <repository-url> {title}\n\
             cd {title}\n\
             ```\n\
             \n\
             ## License\n\
             \n\
             Distributed under the {license} license. See [LICENSE](LICENSE) for details.\n",
            license = self.license.id(),
        )
    }

    pub fn license_text(&self, year: i32) -> String {
        let holder = self.author.as_deref().unwrap_or(&self.name);
        self.license.text(year, holder)
    }

    pub fn gitignore(&self) -> String {
        [
            "# editors",
            ".idea/",
            ".vscode/",
            "*.swp",
            "",
            "# build output",
            "target/",
            "build/",
            "dist/",
            "",
            "# environment",
            ".env",
            ".envrc",
            "",
        ]
        .join("\n")
    }

    /// The scaffold file set: relative path and rendered content.
    pub fn files(&self, year: i32) -> Vec<(&'static str, String)> {
        vec![
            (README, self.readme()),
            (LICENSE, self.license_text(year)),
            (GITIGNORE, self.gitignore()),
        ]
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in path-like values.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("unittest")]
    #[case("xarg-project")]
    #[case("my_lib.rs")]
    #[case("9lives")]
    fn given_valid_name_when_new_then_ok(#[case] name: &str) {
        let project = Project::new(name, "GPLv2", "/tmp/out").unwrap();
        assert_eq!(project.name(), name);
        assert_eq!(project.license(), License::Gpl2);
    }

    #[rstest]
    #[case("unit test")]
    #[case("")]
    #[case("-leading-dash")]
    #[case(".hidden")]
    #[case("slash/name")]
    #[case("emoji✓")]
    fn given_invalid_name_when_new_then_invalid_project_name(#[case] name: &str) {
        let err = Project::new(name, "GPLv2", "/tmp/out").unwrap_err();
        assert_eq!(err, DomainError::InvalidProjectName(name.to_string()));
    }

    #[test]
    fn given_overlong_name_when_new_then_invalid_project_name() {
        let name = "a".repeat(MAX_NAME_LEN + 1);
        assert!(Project::new(&name, "MIT", "/tmp/out").is_err());
        assert!(Project::new(&name[..MAX_NAME_LEN], "MIT", "/tmp/out").is_ok());
    }

    #[test]
    fn given_unknown_license_when_new_then_unknown_license() {
        let err = Project::new("demo", "Proprietary", "/tmp/out").unwrap_err();
        assert!(matches!(err, DomainError::UnknownLicense { .. }));
    }

    #[test]
    fn given_author_when_license_text_then_author_is_holder() {
        let project = Project::new("demo", "MIT", "/tmp/out")
            .unwrap()
            .with_author(Some("Jane Doe".into()));
        let text = project.license_text(2026);
        assert!(text.contains("Copyright (c) 2026 Jane Doe"));
    }

    #[test]
    fn given_blank_author_when_license_text_then_falls_back_to_name() {
        let project = Project::new("demo", "MIT", "/tmp/out")
            .unwrap()
            .with_author(Some("  ".into()));
        assert_eq!(project.author(), None);
        assert!(project.license_text(2026).contains("2026 demo"));
    }

    #[test]
    fn given_project_when_files_then_readme_license_gitignore() {
        let project = Project::new("demo", "Apache2", "/tmp/out").unwrap();
        let files = project.files(2026);
        let names: Vec<_> = files.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec![README, LICENSE, GITIGNORE]);
        assert!(files[0].1.starts_with("# demo\n"));
        assert!(files[0].1.contains("Apache-2.0"));
    }

    #[test]
    fn given_relative_name_when_path_then_joined_to_directory() {
        let project = Project::new("demo", "MIT", "/tmp/out").unwrap();
        assert_eq!(project.path("docs/a.md"), PathBuf::from("/tmp/out/docs/a.md"));
    }
}
