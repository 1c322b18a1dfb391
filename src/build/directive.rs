use crate::result::{CargoLiteError, Result};
use std::path::PathBuf;

/// Required prefix of a delegated build command's first line of output.
pub const SENTINEL: &str = "cargo-lite: ";

const ARTIFACTS_DIRECTIVE: &str = "cargo-lite: artifacts";
const CRATE_ROOT_DIRECTIVE: &str = "cargo-lite: crate_root=";

/** Directive reported by a delegated build command on stdout
 *
 * The stdout contract is line oriented. The first line selects the
 * directive:
 *
 * ```text
 * cargo-lite: artifacts
 * /tmp/libfoo.so
 * /tmp/libfoo.a
 * ```
 *
 * copies each listed file into the artifact cache, while
 *
 * ```text
 * cargo-lite: crate_root=src/lib.rs
 * ```
 *
 * tells the orchestrator to drop the build command and re-enter the direct
 * rustc strategy with that crate root. Anything else, including the bare
 * sentinel with an unknown continuation, is a protocol error.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildDirective {
    Artifacts(Vec<PathBuf>),
    CrateRoot(PathBuf),
}

impl BuildDirective {
    /// Parses a delegated build command's captured stdout.
    pub fn parse(stdout: &str) -> Result<Self> {
        if !stdout.starts_with(SENTINEL) {
            return Err(CargoLiteError::protocol(format!(
                "build command output does not start with '{}':\n{}",
                SENTINEL.trim_end(),
                stdout
            )));
        }

        let mut lines = stdout.lines();
        // The sentinel check above guarantees at least one line.
        let first = lines.next().unwrap_or_default().trim_end();

        if first == ARTIFACTS_DIRECTIVE {
            let artifacts = lines
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(PathBuf::from)
                .collect();
            return Ok(Self::Artifacts(artifacts));
        }

        if let Some(path) = first.strip_prefix(CRATE_ROOT_DIRECTIVE) {
            let path = path.trim();
            if path.is_empty() {
                return Err(CargoLiteError::protocol(
                    "crate_root directive carries an empty path",
                ));
            }
            return Ok(Self::CrateRoot(PathBuf::from(path)));
        }

        Err(CargoLiteError::protocol(format!(
            "unrecognized directive in build command output: {}",
            first
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_artifact_list() {
        let directive =
            BuildDirective::parse("cargo-lite: artifacts\n/tmp/a.so\n/tmp/b.a\n").unwrap();
        assert_eq!(
            directive,
            BuildDirective::Artifacts(vec![PathBuf::from("/tmp/a.so"), PathBuf::from("/tmp/b.a")])
        );
    }

    #[test]
    fn artifact_list_skips_blank_lines() {
        let directive =
            BuildDirective::parse("cargo-lite: artifacts\n\n/tmp/a.so\n\n").unwrap();
        assert_eq!(
            directive,
            BuildDirective::Artifacts(vec![PathBuf::from("/tmp/a.so")])
        );
    }

    #[test]
    fn empty_artifact_list_is_allowed() {
        let directive = BuildDirective::parse("cargo-lite: artifacts\n").unwrap();
        assert_eq!(directive, BuildDirective::Artifacts(vec![]));
    }

    #[test]
    fn parses_crate_root_redirect() {
        let directive =
            BuildDirective::parse("cargo-lite: crate_root=/tmp/src/lib.rs").unwrap();
        assert_eq!(
            directive,
            BuildDirective::CrateRoot(PathBuf::from("/tmp/src/lib.rs"))
        );
    }

    #[test]
    fn rejects_output_without_sentinel() {
        let err = BuildDirective::parse("hello world").unwrap_err();
        assert!(matches!(err, CargoLiteError::Protocol(_)));
    }

    #[test]
    fn rejects_unknown_directive_after_sentinel() {
        let err = BuildDirective::parse("cargo-lite: frobnicate\n").unwrap_err();
        assert!(matches!(err, CargoLiteError::Protocol(_)));
    }

    #[test]
    fn rejects_empty_crate_root() {
        let err = BuildDirective::parse("cargo-lite: crate_root=\n").unwrap_err();
        assert!(matches!(err, CargoLiteError::Protocol(_)));
    }
}
