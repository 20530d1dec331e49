use std::path::PathBuf;
use std::sync::Arc;

use crate::configuration::Configuration;
use crate::document::Document;
use crate::entry::{Entry, EntryGroup};
use crate::file;
use crate::interpolate::Interpolation;
use crate::types::SearchPath;

/// Builder for a [`Configuration`].
///
/// The primary file is either set directly with [`path()`](Self::path) or
/// derived from an application name:
///
/// - `file_name` → `"{app_name}.ini"`
/// - `location` → [`SearchPath::Platform`]
///
/// Without either, the configuration has no primary file: it can still read
/// base files, but [`Configuration::write`] needs an explicit target.
#[derive(Default)]
pub struct ConfigurationBuilder {
    app_name: Option<String>,
    file_name: Option<String>,
    location: Option<SearchPath>,
    path: Option<PathBuf>,
    base_paths: Vec<PathBuf>,
    interpolation: Option<Arc<dyn Interpolation>>,
    auto_save: bool,
    entries: EntryGroup,
}

impl ConfigurationBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Set the application name. This derives the file name and, together
    /// with the location, the primary path.
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the config file name (default: `"{app_name}.ini"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Directory of the primary file (default: [`SearchPath::Platform`]).
    pub fn location(mut self, location: SearchPath) -> Self {
        self.location = Some(location);
        self
    }

    /// Explicit primary file. Takes precedence over name and location.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a file read before the primary file. Missing base files are
    /// skipped; their keys are never written to the primary file.
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_paths.push(path.into());
        self
    }

    pub fn base_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.base_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Interpolation strategy (default: [`EnvInterpolation`](crate::EnvInterpolation)
    /// over the process environment).
    pub fn interpolation(mut self, interpolation: impl Interpolation + 'static) -> Self {
        self.interpolation = Some(Arc::new(interpolation));
        self
    }

    /// Write the primary file after every change. Ignored without a primary
    /// file.
    pub fn auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    pub fn entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(mut self, entries: impl IntoIterator<Item = Entry>) -> Self {
        for entry in entries {
            self.entries.push(entry);
        }
        self
    }

    /// Register a group of entries. Groups flatten depth-first.
    pub fn group(mut self, group: EntryGroup) -> Self {
        self.entries.push(group);
        self
    }

    /// Resolve the effective file name, if an app name or file name is set.
    fn effective_file_name(&self) -> Option<String> {
        if let Some(name) = &self.file_name {
            return Some(name.clone());
        }
        self.app_name.as_ref().map(|app| format!("{app}.ini"))
    }

    /// Resolve the effective location.
    fn effective_location(&self) -> SearchPath {
        self.location.clone().unwrap_or(SearchPath::Platform)
    }

    /// Resolve the primary file path.
    fn effective_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }
        let file_name = self.effective_file_name()?;
        let app_name = self.app_name.as_deref().unwrap_or(&file_name);
        file::resolve_config_path(&self.effective_location(), &file_name, app_name)
    }

    pub fn build(self) -> Configuration {
        let path = self.effective_path();
        let document = match &self.interpolation {
            Some(interpolation) => Document::new().with_shared_interpolation(Arc::clone(interpolation)),
            None => Document::new(),
        };
        Configuration::from_parts(
            path,
            self.base_paths,
            self.auto_save,
            self.entries.into_entries(),
            document,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SectionDecl;
    use crate::interpolate::NoInterpolation;
    use tempfile::TempDir;

    #[test]
    fn app_name_sets_defaults() {
        let builder = Configuration::builder().app_name("myapp");
        assert_eq!(builder.effective_file_name().as_deref(), Some("myapp.ini"));
        assert_eq!(builder.effective_location(), SearchPath::Platform);
    }

    #[test]
    fn override_file_name() {
        let builder = Configuration::builder()
            .app_name("myapp")
            .file_name("custom.cfg");
        assert_eq!(builder.effective_file_name().as_deref(), Some("custom.cfg"));
    }

    #[test]
    fn location_and_file_name_make_the_path() {
        let dir = TempDir::new().unwrap();
        let builder = Configuration::builder()
            .app_name("myapp")
            .location(SearchPath::Path(dir.path().to_path_buf()));
        assert_eq!(builder.effective_path(), Some(dir.path().join("myapp.ini")));
    }

    #[test]
    fn explicit_path_wins() {
        let builder = Configuration::builder()
            .app_name("myapp")
            .location(SearchPath::Cwd)
            .path("/tmp/explicit.ini");
        assert_eq!(builder.effective_path(), Some(PathBuf::from("/tmp/explicit.ini")));
    }

    #[test]
    fn no_name_no_path() {
        let config = Configuration::builder().build();
        assert_eq!(config.path(), None);
    }

    #[test]
    fn base_paths_keep_order() {
        let config = Configuration::builder()
            .base_path("/etc/a.ini")
            .base_paths(["/etc/b.ini", "/etc/c.ini"])
            .build();
        assert_eq!(
            config.base_paths(),
            &[
                PathBuf::from("/etc/a.ini"),
                PathBuf::from("/etc/b.ini"),
                PathBuf::from("/etc/c.ini"),
            ]
        );
    }

    #[test]
    fn entries_and_groups_flatten_in_order() {
        let server = SectionDecl::new("Server");
        let config = Configuration::builder()
            .entry(server.option("host", "localhost", "Host"))
            .group(
                EntryGroup::new("tuning")
                    .entry(server.option("workers", "4", "Workers"))
                    .group(EntryGroup::new("log").entry(Entry::confirm("Log", "verbose", false, "Verbose"))),
            )
            .entries([server.option("port", "80", "Port")])
            .build();
        let keys: Vec<String> = config.entries().iter().map(Entry::key).collect();
        assert_eq!(
            keys,
            vec!["Server:host", "Server:workers", "Log:verbose", "Server:port"]
        );
    }

    #[test]
    fn interpolation_is_passed_to_the_document() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.ini"), "[S]\nx = ${y}\n").unwrap();
        let mut config = Configuration::builder()
            .path(dir.path().join("app.ini"))
            .interpolation(NoInterpolation)
            .build();
        config.load(true).unwrap();
        assert_eq!(config.document().get("S", "x").unwrap(), "${y}");
    }
}
