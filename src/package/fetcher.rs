use crate::package::source::{FetchMethod, PackageSource};
use crate::result::{CargoLiteError, Result};
use crate::store::Store;
use crate::utils::ProcessRunner;
use smol_str::SmolStr;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::fs;

/** Resolves a package source into a directory inside the repository store
 *
 * The store deduplicates by package name: the first fetch of a name wins and
 * every later request for the same name returns the existing directory
 * untouched. That makes fetching idempotent, but it also means a changed
 * upstream (or a changed working directory, for cwd installs) is masked
 * until the store entry is deleted by hand.
 */
#[derive(Default)]
pub struct Fetcher {
    runner: ProcessRunner,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            runner: ProcessRunner::new(),
        }
    }

    /// Fetches a package into the store, returning the path to its source
    /// tree. Exactly one new store entry is created per distinct name.
    pub async fn fetch(&self, store: &Store, source: &PackageSource) -> Result<PathBuf> {
        let Some(location) = source.location.as_deref() else {
            return self.fetch_current_dir(store).await;
        };

        let name = source.package_name()?;
        let dest = store.path_for(&name);
        if store.has(&name) {
            println!(
                "Already found fetched copy of {} at {}, skipping",
                name,
                dest.display()
            );
            log::info!("store hit for {}, skipping fetch", name);
            return Ok(dest);
        }

        store.ensure_root().await?;

        match source.resolve_method()? {
            FetchMethod::Local => {
                log::info!("copying {} -> {}", location, dest.display());
                copy_dir_all(&expand_home(location), &dest).await?;
            }
            FetchMethod::Git => self.clone_with("git", location, &dest).await?,
            FetchMethod::Hg => self.clone_with("hg", location, &dest).await?,
        }

        Ok(dest)
    }

    /// "Install the current directory": copy cwd into the store under the
    /// directory's basename.
    async fn fetch_current_dir(&self, store: &Store) -> Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        let name = cwd
            .file_name()
            .and_then(|n| n.to_str())
            .map(SmolStr::new)
            .ok_or_else(|| {
                CargoLiteError::resolution(format!(
                    "cannot derive a package name from {}",
                    cwd.display()
                ))
            })?;

        let dest = store.path_for(&name);
        if store.has(&name) {
            println!("Already found fetched copy of cwd, skipping");
            log::info!("store hit for cwd package {}, skipping copy", name);
            return Ok(dest);
        }

        store.ensure_root().await?;
        log::info!("copying cwd {} -> {}", cwd.display(), dest.display());
        copy_dir_all(&cwd, &dest).await?;
        Ok(dest)
    }

    async fn clone_with(&self, tool: &str, location: &str, dest: &Path) -> Result<()> {
        let program = self.runner.find_executable(tool)?;
        log::info!("{} clone {} -> {}", tool, location, dest.display());

        let args: [&OsStr; 3] = [OsStr::new("clone"), OsStr::new(location), dest.as_os_str()];
        let output = self.runner.run_captured(&program, args, None).await?;

        if !output.success() {
            return Err(CargoLiteError::process(format!(
                "{} clone of {} failed with status {}:\n{}",
                tool,
                location,
                output.code,
                output.combined()
            )));
        }
        Ok(())
    }
}

/// Expands a leading `~` to the user's home directory.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Recursively copies a directory tree. Symlinks and other special entries
/// are skipped rather than followed.
pub(crate) async fn copy_dir_all(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).await?;

    let mut entries = fs::read_dir(src).await?;
    while let Some(entry) = entries.next_entry().await? {
        let from = entry.path();
        let to = dest.join(entry.file_name());
        let file_type = entry.file_type().await?;

        if file_type.is_dir() {
            Box::pin(copy_dir_all(&from, &to)).await?;
        } else if file_type.is_file() {
            fs::copy(&from, &to).await?;
        }
    }

    Ok(())
}
