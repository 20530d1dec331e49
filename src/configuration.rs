//! The loaded configuration: declared entries on top of a [`Document`].
//!
//! A [`Configuration`] reads its base files and primary file into one layered
//! document, answers entry lookups with the entry default as fallback, asks the
//! user through a [`Prompter`], and writes back only what belongs in the
//! primary file.
//!
//! # Writing
//!
//! [`Configuration::write`] never dumps the in-memory document. It re-reads the
//! target file into a fresh document and overlays:
//!
//! - every declared entry's raw value and comment,
//! - every key changed through [`set_key`](Configuration::set_key),
//! - the removal of every key dropped through [`unset_key`](Configuration::unset_key).
//!
//! Keys that only exist in base files therefore never leak into the primary
//! file, while comments and unrelated keys already in it survive.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::builder::ConfigurationBuilder;
use crate::document::{Document, normalize_option};
use crate::entry::{Entry, EntryValue};
use crate::error::IniformError;
use crate::ops::{self, ConfigResult};
use crate::prompt::Prompter;
use crate::types::ConfigAction;

/// What [`Configuration::load`] found on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Files read, in order.
    pub read: Vec<PathBuf>,
    /// Files that did not exist.
    pub missing: Vec<PathBuf>,
    /// The primary file is configured but does not exist.
    pub primary_missing: bool,
}

#[derive(Debug)]
pub struct Configuration {
    path: Option<PathBuf>,
    base_paths: Vec<PathBuf>,
    auto_save: bool,
    entries: Vec<Entry>,
    document: Document,
    touched: BTreeSet<(String, String)>,
    removed: BTreeSet<(String, String)>,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    pub(crate) fn from_parts(
        path: Option<PathBuf>,
        base_paths: Vec<PathBuf>,
        auto_save: bool,
        entries: Vec<Entry>,
        document: Document,
    ) -> Self {
        Self {
            auto_save: auto_save && path.is_some(),
            path,
            base_paths,
            entries,
            document,
            touched: BTreeSet::new(),
            removed: BTreeSet::new(),
        }
    }

    /// The primary file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn base_paths(&self) -> &[PathBuf] {
        &self.base_paths
    }

    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The declared entry for `section:option`.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        let (section, option) = ops::parse_key(key).ok()?;
        let option = normalize_option(option);
        self.entries
            .iter()
            .find(|e| e.section() == section && normalize_option(e.option()) == option)
    }

    /// The layered document of everything loaded so far.
    pub fn document(&self) -> &Document {
        &self.document
    }

    // -- Loading ----------------------------------------------------------------

    /// Read base files, then the primary file, into a fresh document, and
    /// check that every required entry has a value.
    ///
    /// Missing files are skipped and reported; unless `quiet`, each one is
    /// logged as a warning.
    pub fn load(&mut self, quiet: bool) -> Result<LoadReport, IniformError> {
        let report = self.load_sources(quiet)?;
        self.check_required()?;
        Ok(report)
    }

    /// Like [`load`](Self::load), but when the primary file does not exist the
    /// user is asked for every entry and the answers are written to it.
    pub fn load_or_inquire(&mut self, prompter: &mut dyn Prompter) -> Result<LoadReport, IniformError> {
        let report = self.load_sources(false)?;
        if report.primary_missing {
            self.inquire_loaded(prompter, true)?;
            self.write(None)?;
        }
        self.check_required()?;
        Ok(report)
    }

    fn load_sources(&mut self, quiet: bool) -> Result<LoadReport, IniformError> {
        self.document = self.document.empty_like();
        self.touched.clear();
        self.removed.clear();

        let mut report = LoadReport::default();
        let sources: Vec<PathBuf> = self
            .base_paths
            .iter()
            .chain(self.path.iter())
            .cloned()
            .collect();

        for path in sources {
            match self.document.read_file(&path) {
                Ok(()) => report.read.push(path),
                Err(IniformError::MissingFile { .. }) => {
                    if !quiet {
                        warn!(
                            event = "configuration.load_missing",
                            path = %path.display(),
                            "configuration file not found"
                        );
                    }
                    if self.path.as_ref() == Some(&path) {
                        report.primary_missing = true;
                    }
                    report.missing.push(path);
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            event = "configuration.loaded",
            read = report.read.len(),
            missing = report.missing.len()
        );
        Ok(report)
    }

    fn check_required(&self) -> Result<(), IniformError> {
        for entry in self.entries.iter().filter(|e| e.is_required()) {
            if self.raw_value(entry).trim().is_empty() {
                return Err(IniformError::RequiredValueMissing {
                    section: entry.section().to_string(),
                    option: entry.option().to_string(),
                    path: self
                        .path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<no path>".to_string()),
                });
            }
        }
        Ok(())
    }

    // -- Values -----------------------------------------------------------------

    /// The entry's value, interpolated unless the entry is raw. Falls back to
    /// the default, which is returned as is.
    pub fn value(&self, entry: &Entry) -> Result<String, IniformError> {
        match self.document.lookup_raw(entry.section(), entry.option()) {
            Some(raw) if entry.is_raw() => Ok(raw.to_string()),
            Some(raw) => self.document.interpolate(entry.section(), entry.option(), raw),
            None => Ok(entry.default_raw().to_string()),
        }
    }

    /// The stored raw value, or the default.
    pub fn raw_value(&self, entry: &Entry) -> String {
        self.document
            .lookup_raw(entry.section(), entry.option())
            .unwrap_or(entry.default_raw())
            .to_string()
    }

    pub fn typed_value(&self, entry: &Entry) -> Result<EntryValue, IniformError> {
        self.value(entry).map(|v| entry.decode(&v))
    }

    /// Store a value for the entry, with the entry comment.
    pub fn set_value(&mut self, entry: &Entry, value: &EntryValue) -> Result<(), IniformError> {
        let raw = entry.encode(value);
        self.store(entry.section(), entry.option(), &raw, Some(&entry.comment()))?;
        self.maybe_auto_save()
    }

    /// Store a raw value by `section:option`. Declared entries keep their
    /// comment.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<(), IniformError> {
        let (section, option) = ops::parse_key(key)?;
        let comment = self.entry(key).map(Entry::comment);
        self.store(section, option, value, comment.as_deref())?;
        self.maybe_auto_save()
    }

    /// Remove a key. Returns whether it was present in the document.
    pub fn unset_key(&mut self, key: &str) -> Result<bool, IniformError> {
        let (section, option) = ops::parse_key(key)?;
        let option = normalize_option(option);
        let existed = match self.document.section(section) {
            Some(_) => self.document.remove_option(section, &option)?,
            None => false,
        };
        let k = (section.to_string(), option);
        self.touched.remove(&k);
        self.removed.insert(k);
        self.maybe_auto_save()?;
        Ok(existed)
    }

    fn store(
        &mut self,
        section: &str,
        option: &str,
        raw: &str,
        comment: Option<&str>,
    ) -> Result<(), IniformError> {
        self.document.ensure_section(section)?;
        self.document.set(section, option, raw, comment)?;
        let k = (section.to_string(), normalize_option(option));
        self.removed.remove(&k);
        self.touched.insert(k);
        Ok(())
    }

    fn maybe_auto_save(&self) -> Result<(), IniformError> {
        if self.auto_save {
            debug!(event = "configuration.auto_save");
            self.write(None)?;
        }
        Ok(())
    }

    fn is_entry(&self, section: &str, option: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.section() == section && normalize_option(e.option()) == option)
    }

    // -- Inquiry ----------------------------------------------------------------

    /// Reload quietly, then ask for every entry whose inquire condition holds.
    ///
    /// With `use_existing`, prompts are pre-filled with the current values;
    /// otherwise with the defaults.
    pub fn inquire(&mut self, prompter: &mut dyn Prompter, use_existing: bool) -> Result<(), IniformError> {
        self.load_sources(true)?;
        self.inquire_loaded(prompter, use_existing)
    }

    fn inquire_loaded(&mut self, prompter: &mut dyn Prompter, use_existing: bool) -> Result<(), IniformError> {
        debug!(
            event = "configuration.inquire",
            path = ?self.path,
            entries = self.entries.len()
        );
        let entries = self.entries.clone();
        for entry in &entries {
            if !entry.should_inquire(&self.document) {
                continue;
            }
            let current = if use_existing {
                self.raw_value(entry)
            } else {
                entry.default_raw().to_string()
            };
            let response = prompter.prompt(&entry.prompt_request(&current))?;
            let value = entry.response_value(response);
            self.set_value(entry, &value)?;
        }
        Ok(())
    }

    // -- Writing ----------------------------------------------------------------

    /// Write to `save_path`, or to the primary file when `None`. See the
    /// module docs for what is written. Returns the path written.
    pub fn write(&self, save_path: Option<&Path>) -> Result<PathBuf, IniformError> {
        let path = save_path
            .map(Path::to_path_buf)
            .or_else(|| self.path.clone())
            .ok_or(IniformError::NoSavePath)?;

        let mut out = self.document.empty_like();
        if path.exists() {
            out.read_file(&path)?;
        }

        for (section, option) in &self.removed {
            if out.section(section).is_some() {
                out.remove_option(section, option)?;
            }
        }

        for entry in &self.entries {
            let key = (entry.section().to_string(), normalize_option(entry.option()));
            if self.removed.contains(&key) {
                continue;
            }
            out.ensure_section(entry.section())?;
            out.set(
                entry.section(),
                entry.option(),
                &self.raw_value(entry),
                Some(&entry.comment()),
            )?;
        }

        for (section, option) in &self.touched {
            if self.is_entry(section, option) {
                continue;
            }
            let Some(raw) = self.document.section(section).and_then(|s| s.get(option)) else {
                continue;
            };
            out.ensure_section(section)?;
            out.set(
                section,
                option,
                raw,
                self.document.get_comment(section, Some(option)),
            )?;
        }

        out.write_to_path(&path)?;
        info!(event = "configuration.written", path = %path.display());
        Ok(path)
    }

    // -- Operations -------------------------------------------------------------

    /// Handle a `ConfigAction` and print the result to stdout.
    pub fn handle_and_print(
        &mut self,
        action: &ConfigAction,
        prompter: &mut dyn Prompter,
    ) -> Result<(), IniformError> {
        let result = self.handle(action, prompter)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a `ConfigAction` (list / gen / get / set / unset / inquire).
    /// Only `Inquire` uses the prompter.
    pub fn handle(
        &mut self,
        action: &ConfigAction,
        prompter: &mut dyn Prompter,
    ) -> Result<ConfigResult, IniformError> {
        match action {
            ConfigAction::List => {
                self.load_sources(true)?;
                ops::list_values(self)
            }
            ConfigAction::Gen { output } => {
                let template = ops::template(&self.entries, &self.document)?;
                match output {
                    Some(path) => {
                        template.write_to_path(path)?;
                        Ok(ConfigResult::TemplateWritten { path: path.clone() })
                    }
                    None => Ok(ConfigResult::Template(template.to_string())),
                }
            }
            ConfigAction::Get { key } => {
                self.load_sources(true)?;
                ops::get_value(self, key)
            }
            ConfigAction::Set { key, value } => {
                if self.path.is_none() {
                    return Err(IniformError::NoSavePath);
                }
                self.load_sources(true)?;
                self.set_key(key, value)?;
                self.write(None)?;
                Ok(ConfigResult::ValueSet {
                    key: key.clone(),
                    value: value.clone(),
                })
            }
            ConfigAction::Unset { key } => {
                if self.path.is_none() {
                    return Err(IniformError::NoSavePath);
                }
                self.load_sources(true)?;
                let in_entries = self.entry(key).is_some();
                if !self.unset_key(key)? && !in_entries {
                    return Err(IniformError::KeyNotFound(key.clone()));
                }
                self.write(None)?;
                Ok(ConfigResult::ValueUnset { key: key.clone() })
            }
            ConfigAction::Inquire => {
                self.inquire(prompter, true)?;
                let path = self.write(None)?;
                Ok(ConfigResult::Inquired { path })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::env::MapEnv;
    use crate::fixtures::test::{sample_configuration, sample_entries};
    use crate::interpolate::EnvInterpolation;
    use crate::prompt::{PromptKind, ScriptedPrompter};
    use std::fs;
    use tempfile::TempDir;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn values_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let mut config = sample_configuration(dir.path());
        let report = config.load(true).unwrap();
        assert!(report.primary_missing);
        assert_eq!(report.missing, vec![dir.path().join("app.ini")]);

        let host = config.entry("Server:host").unwrap().clone();
        assert_eq!(config.value(&host).unwrap(), "localhost");
        let verbose = config.entry("Server:verbose").unwrap().clone();
        assert_eq!(config.typed_value(&verbose).unwrap(), EntryValue::Bool(false));
    }

    #[test]
    fn interpolated_and_raw_values() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("app.ini"),
            "[Dirs]\nroot = /srv\ndata = ${root}/data\n",
        )
        .unwrap();
        let mut config = sample_configuration(dir.path());
        config.load(true).unwrap();

        let data = config.entry("Dirs:data").unwrap().clone();
        assert_eq!(config.value(&data).unwrap(), "/srv/data");
        assert_eq!(config.raw_value(&data), "${root}/data");

        let raw = data.clone().raw(true);
        assert_eq!(config.value(&raw).unwrap(), "${root}/data");
    }

    #[test]
    fn layered_base_configs() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.ini");
        fs::write(&base, "[Server]\nhost = base.example\nport = 1\n\n[Shared]\nx = 1\n").unwrap();
        fs::write(dir.path().join("app.ini"), "[Server]\nport = 2\n").unwrap();

        let mut config = Configuration::builder()
            .path(dir.path().join("app.ini"))
            .base_path(&base)
            .entries(sample_entries())
            .build();
        let report = config.load(false).unwrap();
        assert_eq!(report.read.len(), 2);

        let host = config.entry("Server:host").unwrap().clone();
        let port = config.entry("Server:port").unwrap().clone();
        assert_eq!(config.value(&host).unwrap(), "base.example");
        assert_eq!(config.value(&port).unwrap(), "2");
        assert_eq!(config.document().get("Shared", "x").unwrap(), "1");
    }

    #[test]
    fn write_does_not_leak_base_keys() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.ini");
        fs::write(&base, "[Shared]\nsecret = 1\n").unwrap();
        let primary = dir.path().join("app.ini");
        fs::write(&primary, "# mine\n\n[Server]\nport = 2\n\n[Local]\nkeep = me\n").unwrap();

        let mut config = Configuration::builder()
            .path(&primary)
            .base_path(&base)
            .entries(sample_entries())
            .build();
        config.load(true).unwrap();
        config.write(None).unwrap();

        let text = read(&primary);
        assert!(!text.contains("secret"));
        assert!(text.starts_with("# mine\n"));
        assert!(text.contains("keep = me"));
        assert!(text.contains("# Port to listen on\nport = 2"));
        assert!(text.contains("host = localhost"));
    }

    #[test]
    fn write_without_path_fails() {
        let config = Configuration::builder().entries(sample_entries()).build();
        assert!(matches!(config.write(None), Err(IniformError::NoSavePath)));

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested/out.ini");
        assert_eq!(config.write(Some(target.as_path())).unwrap(), target);
        assert!(read(&target).contains("[Server]"));
    }

    #[test]
    fn required_entries_must_have_values() {
        let dir = TempDir::new().unwrap();
        let mut config = Configuration::builder()
            .path(dir.path().join("app.ini"))
            .entry(Entry::text("Auth", "token", "", "API token").required(true))
            .build();
        match config.load(true).unwrap_err() {
            IniformError::RequiredValueMissing { section, option, .. } => {
                assert_eq!(section, "Auth");
                assert_eq!(option, "token");
            }
            other => panic!("expected RequiredValueMissing, got {other:?}"),
        }

        fs::write(dir.path().join("app.ini"), "[Auth]\ntoken = abc\n").unwrap();
        assert!(config.load(true).is_ok());
    }

    #[test]
    fn inquire_stores_answers() {
        let dir = TempDir::new().unwrap();
        let mut config = sample_configuration(dir.path());
        let mut prompter = ScriptedPrompter::new()
            .text("example.org")
            .text("9000")
            .confirm(true)
            .select(["cache", "metrics"]);

        config.inquire(&mut prompter, true).unwrap();

        let get = |k: &str| config.typed_value(config.entry(k).unwrap()).unwrap();
        assert_eq!(get("Server:host"), EntryValue::Text("example.org".into()));
        assert_eq!(get("Server:verbose"), EntryValue::Bool(true));
        assert_eq!(
            get("Features:enabled"),
            EntryValue::List(vec!["cache".into(), "metrics".into()])
        );
        // Remaining entries were asked with their defaults.
        assert_eq!(get("Dirs:root"), EntryValue::Text("/srv/app".into()));

        let asked = prompter.asked();
        assert_eq!(asked[0].message, "Host to bind to:");
        match &asked[3].kind {
            PromptKind::Select { selected, multiselect, .. } => {
                assert!(*multiselect);
                assert_eq!(selected, &vec!["auth".to_string()]);
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn inquire_skips_conditional_entries() {
        let dir = TempDir::new().unwrap();
        let mut config = Configuration::builder()
            .path(dir.path().join("app.ini"))
            .entry(Entry::text("A", "always", "x", "Always"))
            .entry(Entry::text("A", "never", "y", "Never").inquire(false))
            .entry(
                Entry::text("B", "when", "z", "When")
                    .inquire_when(|doc| doc.get_or("A", "always", "").is_ok_and(|v| v == "go")),
            )
            .build();

        let mut prompter = ScriptedPrompter::new().text("stop");
        config.inquire(&mut prompter, true).unwrap();
        assert_eq!(prompter.asked().len(), 1);

        let mut prompter = ScriptedPrompter::new().text("go").text("answered");
        config.inquire(&mut prompter, true).unwrap();
        assert_eq!(prompter.asked().len(), 2);
        let when = config.entry("B:when").unwrap().clone();
        assert_eq!(config.value(&when).unwrap(), "answered");
    }

    #[test]
    fn inquire_without_existing_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.ini"), "[Server]\nhost = old.example\n").unwrap();
        let mut config = sample_configuration(dir.path());
        let mut prompter = ScriptedPrompter::new();
        config.inquire(&mut prompter, false).unwrap();
        match &prompter.asked()[0].kind {
            PromptKind::Text { default } => assert_eq!(default, "localhost"),
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn load_or_inquire_writes_new_file() {
        let dir = TempDir::new().unwrap();
        let mut config = sample_configuration(dir.path());
        let mut prompter = ScriptedPrompter::new().text("first.example");
        let report = config.load_or_inquire(&mut prompter).unwrap();
        assert!(report.primary_missing);

        let text = read(&dir.path().join("app.ini"));
        assert!(text.contains("host = first.example"));

        // Second run finds the file and does not ask.
        let mut prompter = ScriptedPrompter::new();
        let report = config.load_or_inquire(&mut prompter).unwrap();
        assert!(!report.primary_missing);
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn multiselect_written_on_continuation_lines() {
        let dir = TempDir::new().unwrap();
        let entry = Entry::multi_select("Build", "targets", ["x86", "arm", "wasm"], ["x86"], "Targets")
            .delimiter(",\n");
        let mut config = Configuration::builder()
            .path(dir.path().join("app.ini"))
            .entry(entry.clone())
            .build();
        config
            .set_value(&entry, &EntryValue::List(vec!["x86".into(), "arm".into()]))
            .unwrap();
        config.write(None).unwrap();

        let text = read(&dir.path().join("app.ini"));
        assert!(text.contains("targets = x86,\n\tarm\n"), "{text}");

        config.load(true).unwrap();
        assert_eq!(
            config.typed_value(&entry).unwrap(),
            EntryValue::List(vec!["x86".into(), "arm".into()])
        );
    }

    #[test]
    fn multiselect_with_indented_delimiter_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.ini");
        let entry = Entry::multi_select("Build", "items", ["a", "b", "c"], ["a"], "Items")
            .delimiter(",\n        ");
        let mut config = Configuration::builder()
            .path(&path)
            .entry(entry.clone())
            .build();
        let picked = EntryValue::List(vec!["a".into(), "b".into(), "c".into()]);
        config.set_value(&entry, &picked).unwrap();
        config.write(None).unwrap();
        assert!(read(&path).contains("items = a,\n\t        b,\n\t        c\n"));

        let mut reloaded = Configuration::builder()
            .path(&path)
            .entry(entry.clone())
            .build();
        reloaded.load(true).unwrap();
        assert_eq!(reloaded.typed_value(&entry).unwrap(), picked);
    }

    #[test]
    fn auto_save_writes_on_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.ini");
        let mut config = Configuration::builder()
            .path(&path)
            .auto_save(true)
            .entries(sample_entries())
            .build();
        assert!(config.auto_save());
        config.set_key("Server:port", "7000").unwrap();
        assert!(read(&path).contains("port = 7000"));
    }

    #[test]
    fn auto_save_needs_a_path() {
        let config = Configuration::builder().auto_save(true).build();
        assert!(!config.auto_save());
    }

    #[test]
    fn handle_set_and_unset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.ini");
        let mut config = sample_configuration(dir.path());
        let mut prompter = ScriptedPrompter::new();

        let result = config
            .handle(
                &ConfigAction::Set {
                    key: "Extra:thing".into(),
                    value: "42".into(),
                },
                &mut prompter,
            )
            .unwrap();
        assert_eq!(
            result,
            ConfigResult::ValueSet {
                key: "Extra:thing".into(),
                value: "42".into()
            }
        );
        assert!(read(&path).contains("[Extra]\nthing = 42"));

        config
            .handle(
                &ConfigAction::Set {
                    key: "Server:port".into(),
                    value: "7000".into(),
                },
                &mut prompter,
            )
            .unwrap();
        config
            .handle(&ConfigAction::Unset { key: "Extra:thing".into() }, &mut prompter)
            .unwrap();
        let text = read(&path);
        assert!(!text.contains("thing"));
        assert!(text.contains("port = 7000"));

        config
            .handle(&ConfigAction::Unset { key: "Server:port".into() }, &mut prompter)
            .unwrap();
        assert!(!read(&path).contains("port ="));

        assert!(matches!(
            config.handle(&ConfigAction::Unset { key: "Nope:x".into() }, &mut prompter),
            Err(IniformError::KeyNotFound(_))
        ));
    }

    #[test]
    fn handle_set_without_path_fails() {
        let mut config = Configuration::builder().entries(sample_entries()).build();
        let result = config.handle(
            &ConfigAction::Set {
                key: "Server:port".into(),
                value: "1".into(),
            },
            &mut ScriptedPrompter::new(),
        );
        assert!(matches!(result, Err(IniformError::NoSavePath)));
    }

    #[test]
    fn handle_gen_writes_template() {
        let dir = TempDir::new().unwrap();
        let mut config = sample_configuration(dir.path());
        let out = dir.path().join("gen/template.ini");
        let result = config
            .handle(
                &ConfigAction::Gen {
                    output: Some(out.clone()),
                },
                &mut ScriptedPrompter::new(),
            )
            .unwrap();
        assert_eq!(result, ConfigResult::TemplateWritten { path: out.clone() });
        assert!(read(&out).contains("# Host to bind to\nhost = localhost"));

        match config
            .handle(&ConfigAction::Gen { output: None }, &mut ScriptedPrompter::new())
            .unwrap()
        {
            ConfigResult::Template(t) => assert!(t.contains("[Features]")),
            other => panic!("Expected Template, got {other:?}"),
        }
    }

    #[test]
    fn handle_inquire_writes_answers() {
        let dir = TempDir::new().unwrap();
        let mut config = sample_configuration(dir.path());
        let mut prompter = ScriptedPrompter::new().text("inquired.example");
        let result = config.handle(&ConfigAction::Inquire, &mut prompter).unwrap();
        assert_eq!(
            result,
            ConfigResult::Inquired {
                path: dir.path().join("app.ini")
            }
        );
        assert!(read(&dir.path().join("app.ini")).contains("host = inquired.example"));
    }

    #[test]
    fn env_references_use_injected_environment() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.ini"), "[Dirs]\nroot = ${APP_HOME}/root\n").unwrap();
        let mut config = Configuration::builder()
            .path(dir.path().join("app.ini"))
            .interpolation(EnvInterpolation::new().with_env(MapEnv::new().with("APP_HOME", "/h")))
            .entries(sample_entries())
            .build();
        config.load(true).unwrap();
        let root = config.entry("Dirs:root").unwrap().clone();
        assert_eq!(config.value(&root).unwrap(), "/h/root");
    }
}
