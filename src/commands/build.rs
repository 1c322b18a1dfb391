use crate::compiler::Rustc;
use crate::package::{BuildSpec, Installer, Manifest};
use crate::result::{CargoLiteError, Result};
use crate::store::Store;
use crate::utils::ProcessRunner;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub async fn execute(path: Option<&str>) -> Result<()> {
    let mut cmd = BuildCommand::new();
    cmd.execute(path.map(|s| s.to_string())).await
}

/// In-place build: compiles the package where it lives instead of
/// installing it into the store. Dependencies are still installed first so
/// the artifact cache contains everything the build links against.
#[derive(Default)]
pub struct BuildCommand;

impl BuildCommand {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(&mut self, path: Option<String>) -> Result<()> {
        let dir = match path {
            Some(p) => PathBuf::from(p),
            None => std::env::current_dir()?,
        };

        println!("Building package in {}...", dir.display());

        let build_spinner = ProgressBar::new_spinner();
        build_spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        build_spinner.set_message("Loading manifest...");
        build_spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        let store = Store::open()?;
        let manifest = Manifest::load(&dir).await?;

        build_spinner.set_message("Installing dependencies...");
        let installer = Installer::new(store.clone());
        installer.install_deps(&manifest).await?;

        build_spinner.set_message("Compiling package...");
        let build_start = Instant::now();
        let result = self.run_build(&manifest, &dir, &store).await;
        build_spinner.finish_and_clear();

        match result {
            Ok(()) => {
                let time_str = format_duration(build_start.elapsed());
                println!("Build successful ({})", time_str);
                log::info!("in-place build of {} finished in {}", dir.display(), time_str);
                Ok(())
            }
            Err(e) => {
                log::error!("in-place build of {} failed: {}", dir.display(), e);
                Err(e)
            }
        }
    }

    async fn run_build(&self, manifest: &Manifest, dir: &Path, store: &Store) -> Result<()> {
        let Some(build) = &manifest.build else {
            return Err(CargoLiteError::config(CargoLiteError::NO_BUILD_INFO));
        };

        match build {
            BuildSpec::CrateRoot {
                crate_root,
                rustc_args,
            } => {
                let crate_root = if crate_root.is_absolute() {
                    crate_root.clone()
                } else {
                    dir.join(crate_root)
                };

                let rustc = Rustc::locate()?;
                let lib_dir = store.lib_dir().await?;
                // Artifacts stay in the package directory; nothing is
                // copied into the cache for an in-place build.
                rustc
                    .build(&crate_root, rustc_args, &lib_dir, None, dir)
                    .await
            }
            BuildSpec::Command { build_cmd } => {
                let runner = ProcessRunner::new();
                let output = runner
                    .run_captured(Path::new(build_cmd), std::iter::empty::<&OsStr>(), Some(dir))
                    .await?;

                if !output.success() {
                    return Err(CargoLiteError::process(format!(
                        "The build command {} failed with exit code {}:\n{}",
                        build_cmd,
                        output.code,
                        output.combined()
                    )));
                }
                Ok(())
            }
        }
    }
}

fn format_duration(duration: std::time::Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms >= 1000 {
        let seconds = duration.as_secs_f64();
        format!("{:.2}s", seconds)
    } else {
        format!("{}ms", total_ms)
    }
}
