//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The sub directory of a storage root holding layer mount points.
pub const MNT_SUBDIR: &str = "mnt";

/// The sub directory of a storage root holding layer diff content.
pub const DIFF_SUBDIR: &str = "diff";

/// The sub directory of a storage root holding ancestry records.
pub const LAYERS_SUBDIR: &str = "layers";

/// The default sub directory of the home directory used as a storage root.
pub const LAYERDIRS_HOME_DIR: &str = ".layerdirs";

/// The environment variable that overrides the storage root.
pub const LAYERDIRS_ROOT_ENV_VAR: &str = "LAYERDIRS_ROOT";

/// The prefix of staging directories created next to an atomic copy destination.
pub const STAGING_PREFIX: &str = ".staging-";
