use crate::result::{CargoLiteError, Result};
use crate::utils::ProcessRunner;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Library crate types requested from every build: static, dynamic, and
/// rlib for downstream Rust linkage.
const CRATE_TYPES: [&str; 3] = ["rlib", "staticlib", "dylib"];

/** Thin wrapper around the system rustc
 *
 * Two operations, matching the two ways the build orchestrator talks to the
 * compiler:
 * - `artifact_names`: a dry-run query for the output filenames a crate root
 *   would produce, used to decide whether a rebuild can be skipped
 * - `build`: the real compilation, with the artifact cache on the library
 *   search path
 */
pub struct Rustc {
    path: PathBuf,
    runner: ProcessRunner,
}

impl Rustc {
    /// Locates rustc on PATH. Missing rustc is fatal.
    pub fn locate() -> Result<Self> {
        let runner = ProcessRunner::new();
        let path = runner
            .find_executable("rustc")
            .map_err(|_| CargoLiteError::not_found(CargoLiteError::RUSTC_NOT_FOUND))?;
        Ok(Self { path, runner })
    }

    /** Queries the output filenames building `crate_root` would produce
     *
     * Runs `rustc --print file-names` with the full crate-type set; nothing
     * is compiled. A nonzero exit (unreadable crate root, bad attributes)
     * is fatal and surfaces rustc's stderr.
     */
    pub async fn artifact_names(&self, crate_root: &Path, dir: &Path) -> Result<Vec<String>> {
        let mut args: Vec<OsString> = vec!["--print".into(), "file-names".into()];
        for crate_type in CRATE_TYPES {
            args.push("--crate-type".into());
            args.push(crate_type.into());
        }
        args.push(crate_root.into());

        let output = self.runner.run_captured(&self.path, &args, Some(dir)).await?;
        if !output.success() {
            return Err(CargoLiteError::process(format!(
                "rustc --print file-names for {} failed with status {}:\n{}",
                crate_root.display(),
                output.code,
                output.combined()
            )));
        }

        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /** Compiles `crate_root` with the full crate-type set
     *
     * # Arguments
     * * `extra_args` - the manifest's `rustc_args`, passed through first
     * * `lib_dir`    - artifact cache, added as a `-L` search path
     * * `out_dir`    - where artifacts land; `None` leaves rustc's default
     *                  (the working directory)
     * * `dir`        - working directory for the invocation
     *
     * Nonzero exit is fatal; captured output is surfaced verbatim.
     */
    pub async fn build(
        &self,
        crate_root: &Path,
        extra_args: &[String],
        lib_dir: &Path,
        out_dir: Option<&Path>,
        dir: &Path,
    ) -> Result<()> {
        let mut args: Vec<OsString> = extra_args.iter().map(OsString::from).collect();
        args.push(crate_root.into());
        for crate_type in CRATE_TYPES {
            args.push("--crate-type".into());
            args.push(crate_type.into());
        }
        args.push("-L".into());
        args.push(lib_dir.into());
        if let Some(out) = out_dir {
            args.push("--out-dir".into());
            args.push(out.into());
        }

        let output = self.runner.run_captured(&self.path, &args, Some(dir)).await?;
        if !output.success() {
            return Err(CargoLiteError::process(format!(
                "building {} with rustc failed with status {}:\n{}",
                crate_root.display(),
                output.code,
                output.combined()
            )));
        }

        log::info!("rustc built {}", crate_root.display());
        Ok(())
    }
}
