//! Client-side preferences.
//!
//! The only preference is the default registration name, offered as the
//! pre-filled answer whenever the operator is asked for a name. It survives
//! restarts as a small JSON file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading or writing preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// File could not be read or written.
    #[error("preferences file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// File contents are not valid preferences.
    #[error("preferences file {path} is malformed: {source}")]
    Format {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Persisted preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Name suggested when registering.
    #[serde(default)]
    pub default_name: Option<String>,
}

/// Storage for [`Preferences`].
pub trait PreferenceStore: Send {
    /// Remembered default registration name.
    fn default_name(&self) -> Option<String>;

    /// Remember `name` for future prompts.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference could not be persisted. The value
    /// is still remembered for this session.
    fn set_default_name(&mut self, name: &str) -> Result<(), PreferenceError>;
}

/// Preferences kept in a JSON file.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    prefs: Preferences,
}

impl FilePreferences {
    /// Load preferences from `path`. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let prefs = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|source| PreferenceError::Format { path: path.clone(), source })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Preferences::default(),
            Err(source) => return Err(PreferenceError::Io { path, source }),
        };
        Ok(Self { path, prefs })
    }

    /// `<config dir>/rollcall/prefs.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rollcall").join("prefs.json"))
    }

    /// File backing these preferences.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), PreferenceError> {
        let io_err = |source| PreferenceError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_vec_pretty(&self.prefs)
            .map_err(|source| PreferenceError::Format { path: self.path.clone(), source })?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

impl PreferenceStore for FilePreferences {
    fn default_name(&self) -> Option<String> {
        self.prefs.default_name.clone()
    }

    fn set_default_name(&mut self, name: &str) -> Result<(), PreferenceError> {
        self.prefs.default_name = Some(name.to_string());
        self.save()
    }
}

/// In-memory preferences, for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    prefs: Preferences,
}

impl MemoryPreferences {
    /// Preferences with `name` already remembered.
    pub fn with_default_name(name: impl Into<String>) -> Self {
        Self { prefs: Preferences { default_name: Some(name.into()) } }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn default_name(&self) -> Option<String> {
        self.prefs.default_name.clone()
    }

    fn set_default_name(&mut self, name: &str) -> Result<(), PreferenceError> {
        self.prefs.default_name = Some(name.to_string());
        Ok(())
    }
}
