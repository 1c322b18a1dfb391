use crate::build::directive::BuildDirective;
use crate::compiler::Rustc;
use crate::package::manifest::{BuildSpec, Manifest};
use crate::result::{CargoLiteError, Result};
use crate::store::Store;
use crate::utils::ProcessRunner;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/** Executes a package's build steps and populates the artifact cache
 *
 * One package's build runs strictly in order: subpackages first, each in
 * its listed subdirectory with its own manifest, then the package's own
 * `build` section (if any) in the package directory itself. A failure at
 * any step aborts immediately; later subpackages are not attempted and
 * nothing is rolled back.
 */
pub struct Orchestrator<'a> {
    store: &'a Store,
    runner: ProcessRunner,
}

impl<'a> Orchestrator<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            runner: ProcessRunner::new(),
        }
    }

    /// Builds the package described by `manifest`, rooted at `dir`.
    pub async fn build(&self, manifest: &Manifest, dir: &Path) -> Result<()> {
        if !manifest.has_build_info() {
            return Err(CargoLiteError::config(CargoLiteError::NO_BUILD_INFO));
        }

        for sub in &manifest.subpackages {
            let subdir = dir.join(sub);
            log::info!("descending into subpackage {}", subdir.display());
            let sub_manifest = Manifest::load(&subdir).await?;
            Box::pin(self.build(&sub_manifest, &subdir)).await?;
        }

        match &manifest.build {
            Some(BuildSpec::CrateRoot {
                crate_root,
                rustc_args,
            }) => self.build_crate_root(crate_root, rustc_args, dir).await,
            Some(BuildSpec::Command { build_cmd }) => {
                self.run_build_command(build_cmd, dir).await
            }
            // Subpackages only; nothing further to do here.
            None => Ok(()),
        }
    }

    /** Direct-compile strategy
     *
     * Asks rustc which artifact filenames the crate root would produce and
     * skips the whole compilation when every one of them is already in the
     * cache. Filename presence is the only freshness signal; changed
     * sources with unchanged names are not rebuilt.
     */
    async fn build_crate_root(
        &self,
        crate_root: &Path,
        rustc_args: &[String],
        dir: &Path,
    ) -> Result<()> {
        let crate_root = if crate_root.is_absolute() {
            crate_root.to_path_buf()
        } else {
            dir.join(crate_root)
        };

        let rustc = Rustc::locate()?;
        let names = rustc.artifact_names(&crate_root, dir).await?;

        if self.all_artifacts_cached(&names) {
            println!("all artifacts present, not rebuilding");
            log::info!(
                "cache hit for {}: {:?} all present, skipping build",
                crate_root.display(),
                names
            );
            return Ok(());
        }

        let lib_dir = self.store.lib_dir().await?;
        let out_dir: PathBuf = crate_root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dir.to_path_buf());

        rustc
            .build(&crate_root, rustc_args, &lib_dir, Some(&out_dir), dir)
            .await?;

        for name in &names {
            self.store.add_artifact(&out_dir.join(name)).await?;
        }
        Ok(())
    }

    /// Whether every queried artifact name is already in the cache.
    /// Vacuously true for an empty query result, which therefore counts
    /// as a cache hit and skips the build.
    fn all_artifacts_cached(&self, names: &[String]) -> bool {
        names.iter().all(|name| self.store.has_artifact(name))
    }

    /** Delegated-build strategy
     *
     * Runs the package-supplied command with no arguments and interprets
     * its stdout as a `BuildDirective`. An artifact list is copied into the
     * cache; a crate-root redirect falls back to the direct-compile
     * strategy for the same package.
     */
    async fn run_build_command(&self, build_cmd: &str, dir: &Path) -> Result<()> {
        log::info!("delegating build to {}", build_cmd);

        let output = self
            .runner
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

        match BuildDirective::parse(&output.stdout)? {
            BuildDirective::Artifacts(paths) => {
                for path in paths {
                    let path = if path.is_absolute() {
                        path
                    } else {
                        dir.join(path)
                    };
                    self.store.add_artifact(&path).await?;
                }
                Ok(())
            }
            BuildDirective::CrateRoot(path) => {
                log::info!(
                    "build command redirected to crate root {}",
                    path.display()
                );
                self.build_crate_root(&path, &[], dir).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn load_and_build(store: &Store, dir: &Path) -> Result<()> {
        let manifest = Manifest::load(dir).await?;
        Orchestrator::new(store).build(&manifest, dir).await
    }

    fn write_manifest(dir: &Path, content: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join("cargo-lite.conf"), content).unwrap();
    }

    #[cfg(unix)]
    fn write_script(path: &Path, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[tokio::test]
    async fn manifest_with_nothing_to_build_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().join("state"));
        let pkg = tmp.path().join("pkg");
        write_manifest(&pkg, "deps = []\n");

        let err = load_and_build(&store, &pkg).await.unwrap_err();
        assert!(matches!(err, CargoLiteError::Config(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn build_command_artifacts_are_copied_into_cache() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().join("state"));
        let pkg = tmp.path().join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();

        let a = tmp.path().join("liba.so");
        let b = tmp.path().join("libb.a");
        std::fs::write(&a, "a").unwrap();
        std::fs::write(&b, "b").unwrap();

        write_script(
            &pkg.join("fake-build"),
            &format!(
                "echo 'cargo-lite: artifacts'\necho '{}'\necho '{}'",
                a.display(),
                b.display()
            ),
        );
        write_manifest(&pkg, "[build]\nbuild_cmd = \"./fake-build\"\n");

        load_and_build(&store, &pkg).await.unwrap();
        assert!(store.has_artifact("liba.so"));
        assert!(store.has_artifact("libb.a"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn build_command_redirect_switches_to_crate_root_strategy() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().join("state"));
        let pkg = tmp.path().join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("mini.rs"), "pub fn add(a: i32, b: i32) -> i32 { a + b }\n")
            .unwrap();

        write_script(&pkg.join("fake-build"), "echo 'cargo-lite: crate_root=mini.rs'");
        write_manifest(&pkg, "[build]\nbuild_cmd = \"./fake-build\"\n");

        load_and_build(&store, &pkg).await.unwrap();
        assert!(store.has_artifact("libmini.rlib"));
    }

    #[test]
    fn empty_name_query_counts_as_cached() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().join("state"));
        let orchestrator = Orchestrator::new(&store);

        assert!(orchestrator.all_artifacts_cached(&[]));
        assert!(!orchestrator.all_artifacts_cached(&["libmissing.rlib".to_string()]));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn build_command_without_sentinel_is_a_protocol_error() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().join("state"));
        let pkg = tmp.path().join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();

        write_script(&pkg.join("fake-build"), "echo 'hello world'");
        write_manifest(&pkg, "[build]\nbuild_cmd = \"./fake-build\"\n");

        let err = load_and_build(&store, &pkg).await.unwrap_err();
        assert!(matches!(err, CargoLiteError::Protocol(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_build_command_surfaces_exit_code_and_output() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().join("state"));
        let pkg = tmp.path().join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();

        write_script(&pkg.join("fake-build"), "echo 'went sideways' >&2\nexit 3");
        write_manifest(&pkg, "[build]\nbuild_cmd = \"./fake-build\"\n");

        let err = load_and_build(&store, &pkg).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("exit code 3"));
        assert!(message.contains("went sideways"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn subpackages_build_in_order_and_fail_fast() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().join("state"));
        let pkg = tmp.path().join("pkg");
        let trace = tmp.path().join("trace.log");

        write_manifest(&pkg, "subpackages = [\"p1\", \"p2\"]\n");
        for sub in ["p1", "p2"] {
            let subdir = pkg.join(sub);
            std::fs::create_dir_all(&subdir).unwrap();
            write_script(
                &subdir.join("fake-build"),
                &format!("echo {} >> '{}'\necho 'cargo-lite: artifacts'", sub, trace.display()),
            );
            write_manifest(&subdir, "[build]\nbuild_cmd = \"./fake-build\"\n");
        }

        load_and_build(&store, &pkg).await.unwrap();
        assert_eq!(std::fs::read_to_string(&trace).unwrap(), "p1\np2\n");

        // Make p1 fail; p2 must not be attempted on the next run.
        write_script(&pkg.join("p1/fake-build"), "exit 1");
        std::fs::remove_file(&trace).unwrap();

        load_and_build(&store, &pkg).await.unwrap_err();
        assert!(!trace.exists());
    }

    #[tokio::test]
    async fn crate_root_build_populates_cache_and_then_skips() {
        let tmp = TempDir::new().unwrap();
        let store = Store::at(tmp.path().join("state"));
        let pkg = tmp.path().join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("mini.rs"), "pub fn add(a: i32, b: i32) -> i32 { a + b }\n")
            .unwrap();
        write_manifest(&pkg, "[build]\ncrate_root = \"mini.rs\"\n");

        load_and_build(&store, &pkg).await.unwrap();
        assert!(store.has_artifact("libmini.rlib"));

        // Second build must hit the cache: wipe the produced files next to
        // the crate root and check they are not regenerated.
        for entry in std::fs::read_dir(&pkg).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            if name.starts_with("libmini") {
                std::fs::remove_file(&path).unwrap();
            }
        }

        load_and_build(&store, &pkg).await.unwrap();
        let regenerated = std::fs::read_dir(&pkg)
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with("libmini"));
        assert!(!regenerated, "cache hit should skip compilation entirely");
    }
}
