use std::borrow::Cow;
use thiserror::Error;

/** Main Result type alias for cargo-lite operations
 *
 * # Usage
 * ```no_run
 * use cargo_lite::result::Result;
 *
 * async fn read_manifest() -> Result<String> {
 *     // Function automatically propagates CargoLiteError
 *     let content = std::fs::read_to_string("cargo-lite.conf")?;
 *     Ok(content)
 * }
 * ```
 */
pub type Result<T> = std::result::Result<T, CargoLiteError>;

/** Error enumeration for cargo-lite
 *
 * # Error Categories
 * - **Io**: File system and I/O operations
 * - **Process**: External tool failures (git, hg, rustc, build commands)
 * - **Config**: Manifest loading and validation errors
 * - **Resolution**: Fetch-method inference and dependency resolution errors
 * - **Protocol**: Malformed delegated build-command output
 * - **NotFound**: Missing executables or files
 * - **TomlParse**: Manifest parsing failures
 *
 * # Design Notes
 * - Uses `Cow<'static, str>` for efficient string storage
 * - Automatic From implementations for common error types
 * - Every error is fatal: the process exits nonzero without retrying
 */
#[derive(Error, Debug)]
pub enum CargoLiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process error: {0}")]
    Process(Cow<'static, str>),

    #[error("Config error: {0}")]
    Config(Cow<'static, str>),

    #[error("Resolution error: {0}")]
    Resolution(Cow<'static, str>),

    #[error("Protocol error: {0}")]
    Protocol(Cow<'static, str>),

    #[error("Not found: {0}")]
    NotFound(Cow<'static, str>),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/** Error constants and constructor methods
 *
 * # Purpose
 * - Provides commonly used error messages as constants
 * - Offers convenient constructor methods for each error variant
 * - Ensures consistent error messaging across the codebase
 *
 * # Usage Examples
 * ```ignore
 * use cargo_lite::result::CargoLiteError;
 *
 * // Using constant error messages
 * return Err(CargoLiteError::not_found(CargoLiteError::RUSTC_NOT_FOUND));
 *
 * // Using dynamic messages
 * return Err(CargoLiteError::process(format!("git clone exited with {}", code)));
 * ```
 */
impl CargoLiteError {
    // Process-related error constants
    pub const RUSTC_NOT_FOUND: &'static str = "cargo-lite requires rustc to be installed";

    // Resolution-related error constants
    pub const NO_FETCH_METHOD: &'static str =
        "neither --git, --hg nor --local given, and can't infer from package path";

    // Configuration-related error constants
    pub const NO_BUILD_INFO: &'static str = "no build information in cargo-lite.conf";

    /** Creates a Process error with flexible message input
     *
     * # Supported Input Types
     * - `&'static str` for static strings (no allocation)
     * - `String` for dynamic strings
     * - Any type implementing `Into<Cow<'static, str>>`
     */
    pub fn process(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Process(msg.into())
    }

    /** Creates a Config error with flexible message input
     *
     * # Use Cases
     * - Missing manifest files
     * - Manifests with neither `build` nor `subpackages`
     * - Malformed dependency entries
     */
    pub fn config(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(msg.into())
    }

    /** Creates a Resolution error with flexible message input
     *
     * # Use Cases
     * - Fetch method neither specified nor inferable
     * - Package names that cannot be derived from a location
     * - Dependency cycles
     */
    pub fn resolution(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Resolution(msg.into())
    }

    /** Creates a Protocol error with flexible message input
     *
     * # Use Cases
     * - Delegated build-command output missing the sentinel prefix
     * - Unrecognized directives after the sentinel
     */
    pub fn protocol(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Protocol(msg.into())
    }

    /** Creates a NotFound error with flexible message input
     *
     * # Use Cases
     * - Missing external executables (git, hg, rustc)
     * - Missing files referenced by a manifest
     */
    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }
}

/*
 * Error Handling Notes:
 *
 * 1. When to use each error variant:
 *    - Io: File operations, directory copies, system calls
 *    - Process: External command execution, nonzero exit codes
 *    - Config: Manifest loading, parsing, validation
 *    - Resolution: Fetch-method inference, dependency cycles
 *    - Protocol: Delegated build-command stdout contract
 *    - NotFound: Missing executables, files, store entries
 *
 * 2. Failure model:
 *    - All errors are fatal and propagate to main, which exits nonzero
 *    - No retries, no partial rollback; a failed build may leave a
 *      partially populated repository entry behind
 *    - External-tool failures carry the captured output and exit code
 */
