use crate::result::{CargoLiteError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filename of the package description expected in every package directory.
pub const MANIFEST_FILE: &str = "cargo-lite.conf";

/** Declarative build description of a single package
 *
 * Loaded from `cargo-lite.conf` in the package root:
 *
 * ```toml
 * deps = [
 *     ["--git", "https://github.com/bjz/glfw-rs.git"],
 * ]
 * subpackages = ["core", "bindings"]
 *
 * [build]
 * crate_root = "src/lib.rs"
 * rustc_args = ["-O"]
 * ```
 *
 * A manifest must carry at least one of `build` or `subpackages`; the build
 * orchestrator rejects one with neither, since there is nothing to do.
 */
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Dependencies as argv-style install requests, installed in order.
    #[serde(default)]
    pub deps: Vec<Vec<String>>,

    pub build: Option<BuildSpec>,

    /// Relative paths to nested packages, each with its own manifest,
    /// built in listed order before this package's own build step.
    #[serde(default)]
    pub subpackages: Vec<PathBuf>,
}

/// The two mutually exclusive shapes of a `[build]` section.
///
/// Modeled as a tagged union so a manifest mixing both shapes cannot be
/// represented; `crate_root` wins deserialization when both keys appear.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BuildSpec {
    /// Hand the crate root straight to rustc.
    CrateRoot {
        crate_root: PathBuf,
        #[serde(default)]
        rustc_args: Vec<String>,
    },
    /// Delegate to an external command that reports results on stdout.
    Command { build_cmd: String },
}

impl Manifest {
    /** Loads the manifest from a package directory
     *
     * # Errors
     * - `Config` if `<dir>/cargo-lite.conf` does not exist
     * - `Config` if the file is not valid TOML for this schema
     *
     * No further validation happens here; a manifest with nothing to build
     * surfaces as the orchestrator's error, not the loader's.
     */
    pub async fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(CargoLiteError::Config(
                format!("{} does not exist", path.display()).into(),
            ));
        }

        let content = fs::read_to_string(&path).await?;
        let manifest: Manifest = toml::from_str(&content).map_err(|e| {
            CargoLiteError::Config(
                format!("invalid manifest at {}: {}", path.display(), e).into(),
            )
        })?;

        Ok(manifest)
    }

    /// Whether this manifest describes anything buildable.
    pub fn has_build_info(&self) -> bool {
        self.build.is_some() || !self.subpackages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_crate_root_build() {
        let manifest: Manifest = toml::from_str(
            r#"
            deps = [["--git", "https://github.com/bjz/glfw-rs.git"]]

            [build]
            crate_root = "src/lib.rs"
            rustc_args = ["-O"]
            "#,
        )
        .unwrap();

        assert_eq!(manifest.deps.len(), 1);
        assert!(manifest.has_build_info());
        match manifest.build.unwrap() {
            BuildSpec::CrateRoot {
                crate_root,
                rustc_args,
            } => {
                assert_eq!(crate_root, PathBuf::from("src/lib.rs"));
                assert_eq!(rustc_args, vec!["-O".to_string()]);
            }
            BuildSpec::Command { .. } => panic!("expected crate_root shape"),
        }
    }

    #[test]
    fn parses_build_cmd() {
        let manifest: Manifest = toml::from_str(
            r#"
            [build]
            build_cmd = "./configure-and-make"
            "#,
        )
        .unwrap();

        match manifest.build.unwrap() {
            BuildSpec::Command { build_cmd } => assert_eq!(build_cmd, "./configure-and-make"),
            BuildSpec::CrateRoot { .. } => panic!("expected build_cmd shape"),
        }
    }

    #[test]
    fn parses_subpackages_without_build() {
        let manifest: Manifest = toml::from_str(r#"subpackages = ["core", "gl"]"#).unwrap();
        assert!(manifest.build.is_none());
        assert_eq!(
            manifest.subpackages,
            vec![PathBuf::from("core"), PathBuf::from("gl")]
        );
        assert!(manifest.has_build_info());
    }

    #[test]
    fn empty_manifest_has_nothing_to_build() {
        let manifest: Manifest = toml::from_str("").unwrap();
        assert!(!manifest.has_build_info());
    }

    #[test]
    fn unrecognized_build_shape_is_rejected() {
        let parsed: std::result::Result<Manifest, _> = toml::from_str(
            r#"
            [build]
            makefile = "Makefile"
            "#,
        );
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn load_fails_when_manifest_is_missing() {
        let tmp = TempDir::new().unwrap();
        let err = Manifest::load(tmp.path()).await.unwrap_err();
        assert!(matches!(err, CargoLiteError::Config(_)));
        assert!(err.to_string().contains("cargo-lite.conf"));
    }

    #[tokio::test]
    async fn load_reads_manifest_from_directory() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(MANIFEST_FILE),
            "[build]\ncrate_root = \"lib.rs\"\n",
        )
        .unwrap();

        let manifest = Manifest::load(tmp.path()).await.unwrap();
        assert!(matches!(
            manifest.build,
            Some(BuildSpec::CrateRoot { .. })
        ));
    }
}
