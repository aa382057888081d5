//! Default configuration values

/// Project file extensions of the managed format
pub const MANAGED_EXTENSIONS: &[&str] = &["csproj"];

/// Project file extensions of the native and legacy-native formats
pub const NATIVE_EXTENSIONS: &[&str] = &["vcxproj", "nativeproj"];

/// Binary suffixes stripped from assembly names before lookup
pub const BINARY_EXTENSIONS: &[&str] = &["dll", "exe", "winmd"];

/// Moniker prefix of the portable "standard" framework family
pub const STANDARD_FRAMEWORK_PREFIX: &str = "nets";

/// Number of leading characters compared between framework monikers
pub const FRAMEWORK_PREFIX_LEN: usize = 4;

/// Default external build program
pub const DEFAULT_BUILD_TOOL: &str = "build";

/// File the build tool leaves in a project directory when it fails
pub const DEFAULT_ERROR_MARKER: &str = "build.err";

/// Default checkpoint file name, relative to the invocation directory
pub const DEFAULT_CHECKPOINT_FILE: &str = "buildchain.resume";

/// Primary restore tool looked up on PATH when nothing else names it
pub const DEFAULT_RESTORE_TOOL: &str = "nuget";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
