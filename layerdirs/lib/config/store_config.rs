use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use getset::Getters;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{utils::LAYERDIRS_ROOT_ENV_VAR, LayerdirsError, LayerdirsResult};

use super::DEFAULT_LAYERDIRS_ROOT;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Configuration for a layer store.
///
/// ```toml
/// root = "/var/lib/layerdirs"
/// label = "container_t"
/// atomic = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder, PartialEq, Eq, Getters)]
#[getset(get = "pub with_prefix")]
pub struct StoreConfig {
    /// The storage root holding `mnt/`, `diff/` and `layers/`.
    #[serde(default = "default_root")]
    #[builder(default = default_root(), setter(into))]
    root: PathBuf,

    /// The label diffs are materialized under when none is given explicitly.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[builder(default, setter(strip_option, into))]
    label: Option<String>,

    /// Whether materialization stages the copy and publishes it with a rename.
    #[serde(default)]
    #[builder(default)]
    atomic: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StoreConfig {
    /// Loads a configuration from a TOML file.
    ///
    /// A missing file yields the default configuration. The `LAYERDIRS_ROOT` environment variable,
    /// when set, overrides the root from the file.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> LayerdirsResult<Self> {
        let path = path.as_ref();
        let mut config = match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => return Err(LayerdirsError::read(path, e)),
        };

        if let Some(root) = env::var_os(LAYERDIRS_ROOT_ENV_VAR) {
            tracing::debug!("{LAYERDIRS_ROOT_ENV_VAR} overrides root: {root:?}");
            config.root = PathBuf::from(root);
        }

        Ok(config)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml(contents: &str) -> LayerdirsResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Returns a copy of this configuration with `root` replaced.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn default_root() -> PathBuf {
    DEFAULT_LAYERDIRS_ROOT.clone()
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for StoreConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
