//! Environment variable names

/// Path of the primary restore tool used for managed projects
pub const RESTORE_TOOL: &str = "BUILDCHAIN_NUGET_PATH";

/// Command line used to restore projects of the other formats
pub const ALT_RESTORE_COMMAND: &str = "BUILDCHAIN_ALT_RESTORE";

/// Override for the directory holding `config.toml`
pub const CONFIG_DIR: &str = "BUILDCHAIN_CONFIG_DIR";
