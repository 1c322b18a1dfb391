use crate::result::{CargoLiteError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/** Durable on-disk state shared by every cargo-lite invocation
 *
 * The store root (by default `~/.cargo-lite`, overridable with the
 * `CARGO_LITE_HOME` environment variable) contains:
 *
 * ```text
 * ~/.cargo-lite/
 *   lib/            <- artifact cache: flat namespace of built library files
 *   <package>/      <- repository store: one fetched source tree per name
 *   <package>/
 * ```
 *
 * Lifecycle is "create directory if absent, append forever": entries are
 * never refreshed or removed by cargo-lite itself. A package directory that
 * already exists is treated as fully up to date, with no staleness check.
 * Delete the entry by hand to force a re-fetch.
 *
 * # Example
 * ```no_run
 * use cargo_lite::store::Store;
 *
 * #[tokio::main(flavor = "current_thread")]
 * async fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let store = Store::open()?;
 *     if !store.has("glfw-rs") {
 *         println!("would fetch into {}", store.path_for("glfw-rs").display());
 *     }
 *     Ok(())
 * }
 * ```
 */
#[derive(Debug, Clone)]
pub struct Store {
    // Root directory holding the repository store and the lib subdirectory
    root: PathBuf,
}

impl Store {
    /** Opens the store at its default location
     *
     * # Resolution order
     * 1. `CARGO_LITE_HOME` environment variable, if set and non-empty
     * 2. `~/.cargo-lite` under the user's home directory
     *
     * # Errors
     * - `NotFound` if no home directory can be determined
     *
     * # Notes
     * - The root directory itself is created lazily on first write
     */
    pub fn open() -> Result<Self> {
        if let Ok(custom) = std::env::var("CARGO_LITE_HOME") {
            if !custom.is_empty() {
                return Ok(Self::at(PathBuf::from(custom)));
            }
        }

        let home = dirs::home_dir().ok_or_else(|| {
            CargoLiteError::not_found("home directory could not be determined")
        })?;

        Ok(Self::at(home.join(".cargo-lite")))
    } // open

    /// Opens a store rooted at an explicit directory (used by tests).
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /** Returns the repository-store path reserved for a package name
     *
     * The path is purely derived; nothing is created. Combine with `has`
     * to decide whether a fetch is required.
     */
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    } // path_for

    /// Whether a fetched copy of `name` already exists in the store.
    pub fn has(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    /** Returns the artifact cache directory, creating it if absent
     *
     * The cache lives at `<root>/lib` and is handed to rustc as a library
     * search path (`-L`) so that later builds can link against previously
     * installed artifacts.
     */
    pub async fn lib_dir(&self) -> Result<PathBuf> {
        let dir = self.root.join("lib");
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
        }
        Ok(dir)
    } // lib_dir

    /// Path a named artifact would occupy in the cache; nothing is created.
    pub fn artifact_path(&self, filename: &str) -> PathBuf {
        self.root.join("lib").join(filename)
    }

    /// Whether a built artifact with this filename is already cached.
    ///
    /// Presence of the file is the only freshness signal cargo-lite uses;
    /// source changes are not detected.
    pub fn has_artifact(&self, filename: &str) -> bool {
        self.artifact_path(filename).exists()
    }

    /** Copies a built artifact into the cache
     *
     * # Arguments
     * * `source` - Path of the file produced by a build step
     *
     * # Errors
     * - `Process` if the source path has no filename component
     * - `Io` if the copy fails (missing source, permissions, ...)
     *
     * # Notes
     * - An existing cached file with the same name is overwritten
     * - The cache directory is created lazily on first use
     */
    pub async fn add_artifact(&self, source: &Path) -> Result<PathBuf> {
        let filename = source
            .file_name()
            .ok_or_else(|| {
                CargoLiteError::process(format!(
                    "artifact path has no filename: {}",
                    source.display()
                ))
            })?
            .to_os_string();

        let lib = self.lib_dir().await?;
        let dest = lib.join(&filename);
        fs::copy(source, &dest).await?;

        log::debug!(
            "cached artifact {} -> {}",
            source.display(),
            dest.display()
        );
        Ok(dest)
    } // add_artifact

    /// Ensures the store root exists, for callers about to write into it.
    pub async fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn path_for_joins_name_under_root() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().to_path_buf());

        assert_eq!(store.path_for("foo"), tmp.path().join("foo"));
        assert!(!store.has("foo"));

        std::fs::create_dir(tmp.path().join("foo")).unwrap();
        assert!(store.has("foo"));
    }

    #[tokio::test]
    async fn lib_dir_is_created_lazily() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().join("state"));

        assert!(!tmp.path().join("state").join("lib").exists());
        let lib = store.lib_dir().await.unwrap();
        assert!(lib.is_dir());
        assert_eq!(lib, tmp.path().join("state").join("lib"));
    }

    #[tokio::test]
    async fn add_artifact_copies_into_cache() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().join("state"));

        let src = tmp.path().join("libfoo.rlib");
        std::fs::write(&src, b"not a real rlib").unwrap();

        assert!(!store.has_artifact("libfoo.rlib"));
        let dest = store.add_artifact(&src).await.unwrap();
        assert!(store.has_artifact("libfoo.rlib"));
        assert_eq!(std::fs::read(dest).unwrap(), b"not a real rlib");
    }

    #[tokio::test]
    async fn add_artifact_rejects_bare_root() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().to_path_buf());

        let err = store.add_artifact(Path::new("/")).await.unwrap_err();
        assert!(matches!(err, CargoLiteError::Process(_)));
    }
}
