//! Configuration constants and profile loading for mediaboard
//!
//! Profiles live in an INI file, one section per profile:
//!
//! ```ini
//! [default]
//! store_url = https://my-board.example.com
//! posts_limit = 25
//! catalog = ~/.mediaboard/catalog.json
//! likes = ~/.mediaboard/likes.json
//! ```

use crate::board::error::{BoardError, BoardResult};
use crate::board::view_models::DEFAULT_POSTS_LIMIT;
use ini::Ini;
use std::path::{Path, PathBuf};

/// Default profile file path for mediaboard
pub const DEFAULT_PROFILE_PATH: &str = "~/.mediaboard/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "MEDIABOARD_PROFILE_PATH";

/// Default location of the per-device like ledger
pub const DEFAULT_LIKES_PATH: &str = "~/.mediaboard/likes.json";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Expand a leading `~` and environment variables
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            tracing::warn!("Could not expand '{}': {}", raw, e);
            PathBuf::from(shellexpand::tilde(raw).as_ref())
        }
    }
}

/// Settings of one named profile
#[derive(Debug, Clone, PartialEq)]
pub struct BoardProfile {
    store_url: Option<String>,
    posts_limit: usize,
    catalog: Option<PathBuf>,
    likes: PathBuf,
}

impl BoardProfile {
    /// Profile used when none is configured
    pub fn blank() -> Self {
        Self {
            store_url: None,
            posts_limit: DEFAULT_POSTS_LIMIT,
            catalog: None,
            likes: expand_path(DEFAULT_LIKES_PATH),
        }
    }

    /// Base URL of the document store; required for anything touching the network
    pub fn store_url(&self) -> BoardResult<&str> {
        self.store_url
            .as_deref()
            .ok_or_else(|| BoardError::Config("store_url is not set in the profile".to_string()))
    }

    pub fn posts_limit(&self) -> usize {
        self.posts_limit
    }

    pub fn catalog(&self) -> Option<&Path> {
        self.catalog.as_deref()
    }

    pub fn likes(&self) -> &Path {
        &self.likes
    }

    pub fn with_store_url(mut self, store_url: impl Into<String>) -> Self {
        self.store_url = Some(store_url.into());
        self
    }
}

impl Default for BoardProfile {
    fn default() -> Self {
        Self::blank()
    }
}

/// Reads profiles out of an INI file
#[derive(Debug, Clone)]
pub struct IniProfileStore {
    path: PathBuf,
}

impl IniProfileStore {
    pub fn new(path: &str) -> Self {
        Self {
            path: expand_path(path),
        }
    }

    /// Profile named `name`, or `None` when the file or section is missing
    pub fn get_profile(&self, name: &str) -> BoardResult<Option<BoardProfile>> {
        if !self.path.exists() {
            tracing::debug!("Profile file {} does not exist", self.path.display());
            return Ok(None);
        }

        let ini = Ini::load_from_file(&self.path).map_err(|e| {
            BoardError::Config(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let Some(section) = ini.section(Some(name)) else {
            return Ok(None);
        };

        let mut profile = BoardProfile::blank();
        if let Some(url) = section.get("store_url").map(str::trim) {
            if !url.is_empty() {
                profile.store_url = Some(url.to_string());
            }
        }
        if let Some(limit) = section.get("posts_limit") {
            profile.posts_limit = limit
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| {
                    BoardError::Config(format!("posts_limit must be a positive number, got '{limit}'"))
                })?;
        }
        if let Some(catalog) = section.get("catalog") {
            profile.catalog = Some(expand_path(catalog.trim()));
        }
        if let Some(likes) = section.get("likes") {
            profile.likes = expand_path(likes.trim());
        }
        Ok(Some(profile))
    }
}

/// Load a profile by name, falling back to the blank profile
pub fn load_profile(name: &str, path: &str) -> BoardResult<BoardProfile> {
    tracing::debug!("Loading profile '{}' from '{}'", name, path);
    match IniProfileStore::new(path).get_profile(name)? {
        Some(profile) => {
            tracing::debug!("Profile loaded, store: {:?}", profile.store_url);
            Ok(profile)
        }
        None => {
            tracing::debug!("Profile '{}' not found, using blank profile", name);
            Ok(BoardProfile::blank())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn profile_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_profile_path() {
        assert_eq!(DEFAULT_PROFILE_PATH, "~/.mediaboard/profile");
    }

    #[test]
    fn test_get_profile_path_default() {
        // Save current env var state
        let original = std::env::var_os(PROFILE_PATH_ENV_VAR);

        // Remove env var if set
        std::env::remove_var(PROFILE_PATH_ENV_VAR);
        assert_eq!(get_profile_path(), DEFAULT_PROFILE_PATH);

        // Restore original state
        if let Some(val) = original {
            std::env::set_var(PROFILE_PATH_ENV_VAR, val);
        }
    }

    #[test]
    fn test_get_profile_path_env_override() {
        let original = std::env::var_os(PROFILE_PATH_ENV_VAR);

        let test_path = "/custom/profile/path";
        std::env::set_var(PROFILE_PATH_ENV_VAR, test_path);
        assert_eq!(get_profile_path(), test_path);

        match original {
            Some(val) => std::env::set_var(PROFILE_PATH_ENV_VAR, val),
            None => std::env::remove_var(PROFILE_PATH_ENV_VAR),
        }
    }

    #[test]
    fn profile_should_read_all_keys() {
        let file = profile_file(
            "[default]\nstore_url = https://board.example\nposts_limit = 10\ncatalog = /tmp/catalog.json\nlikes = /tmp/likes.json\n",
        );
        let profile = load_profile("default", file.path().to_str().unwrap()).unwrap();

        assert_eq!(profile.store_url().unwrap(), "https://board.example");
        assert_eq!(profile.posts_limit(), 10);
        assert_eq!(profile.catalog(), Some(Path::new("/tmp/catalog.json")));
        assert_eq!(profile.likes(), Path::new("/tmp/likes.json"));
    }

    #[test]
    fn missing_profile_should_fall_back_to_blank() {
        let file = profile_file("[other]\nstore_url = https://x.example\n");
        let profile = load_profile("default", file.path().to_str().unwrap()).unwrap();
        assert_eq!(profile, BoardProfile::blank());
        assert!(matches!(profile.store_url(), Err(BoardError::Config(_))));

        let missing = load_profile("default", "/nonexistent/mediaboard/profile").unwrap();
        assert_eq!(missing.posts_limit(), DEFAULT_POSTS_LIMIT);
    }

    #[test]
    fn invalid_posts_limit_should_be_a_config_error() {
        let file = profile_file("[default]\nposts_limit = lots\n");
        let result = load_profile("default", file.path().to_str().unwrap());
        assert!(matches!(result, Err(BoardError::Config(_))));
    }
}
