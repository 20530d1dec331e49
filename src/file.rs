//! Location of the primary config file.
//!
//! A [`SearchPath`] names a directory; the file name is joined onto it.
//! `Platform` and `Home` go through the [directories](https://docs.rs/directories)
//! crate and need an application name.

use std::path::PathBuf;

use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` is used by `SearchPath::Platform` to construct the platform-specific
/// config directory (e.g. `~/.config/{app_name}/` on Linux).
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// `{dir}/{file_name}` for the resolved directory.
pub fn resolve_config_path(sp: &SearchPath, file_name: &str, app_name: &str) -> Option<PathBuf> {
    resolve_search_path(sp, app_name).map(|dir| dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_is_used_verbatim() {
        let dir = TempDir::new().unwrap();
        let sp = SearchPath::Path(dir.path().to_path_buf());
        assert_eq!(resolve_search_path(&sp, "app"), Some(dir.path().to_path_buf()));
        assert_eq!(
            resolve_config_path(&sp, "app.ini", "app"),
            Some(dir.path().join("app.ini"))
        );
    }

    #[test]
    fn cwd_resolves_to_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve_search_path(&SearchPath::Cwd, "app"), Some(cwd));
    }

    #[test]
    fn platform_dir_mentions_app_name() {
        if let Some(dir) = resolve_search_path(&SearchPath::Platform, "iniform-test-app") {
            assert!(dir.to_string_lossy().contains("iniform-test-app"));
        }
    }

    #[test]
    fn home_joins_subdir() {
        if let Some(dir) = resolve_search_path(&SearchPath::Home(".iniform-test"), "app") {
            assert!(dir.ends_with(".iniform-test"));
        }
    }
}
