use std::{path::PathBuf, sync::LazyLock};

use crate::utils::LAYERDIRS_HOME_DIR;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The storage root used when no home directory can be determined.
pub const FALLBACK_LAYERDIRS_ROOT: &str = "/var/lib/layerdirs";

/// The default name of the configuration file.
pub const DEFAULT_CONFIG_FILENAME: &str = "layerdirs.toml";

/// The default storage root, `$HOME/.layerdirs`.
pub static DEFAULT_LAYERDIRS_ROOT: LazyLock<PathBuf> = LazyLock::new(|| {
    dirs::home_dir()
        .map(|home| home.join(LAYERDIRS_HOME_DIR))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_LAYERDIRS_ROOT))
});
