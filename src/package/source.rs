use crate::result::{CargoLiteError, Result};
use smol_str::SmolStr;
use std::path::Path;

/// How a package's source tree is obtained.
///
/// `Git` is inferred when the location ends in `.git`; `Hg` is never
/// inferred and must be requested explicitly, matching the CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMethod {
    Local,
    Git,
    Hg,
}

/// A reference to a package: where it lives, what to call it, and how to
/// fetch it. `location: None` means "install the current directory".
#[derive(Debug, Clone)]
pub struct PackageSource {
    pub location: Option<String>,
    pub name: Option<SmolStr>,
    pub method: Option<FetchMethod>,
}

impl PackageSource {
    pub fn new(
        location: Option<String>,
        name: Option<SmolStr>,
        method: Option<FetchMethod>,
    ) -> Self {
        Self {
            location,
            name,
            method,
        }
    }

    /// Source for the current working directory.
    pub fn current_dir() -> Self {
        Self::new(None, None, None)
    }

    /** Parses a manifest `deps` entry into a package source
     *
     * Each entry is an argv-style list using the same shapes the CLI's
     * `install` command accepts: an optional method flag (`--git`, `--hg`,
     * `--local`), a source path or URL, and an optional package name, e.g.
     *
     * ```toml
     * deps = [
     *     ["--git", "https://github.com/bjz/glfw-rs.git"],
     *     ["--local", "../shared", "shared"],
     * ]
     * ```
     */
    pub fn from_dep_args(args: &[String]) -> Result<Self> {
        let mut method = None;
        let mut positional: Vec<&str> = Vec::new();

        for arg in args {
            match arg.as_str() {
                "--local" => method = Some(FetchMethod::Local),
                "--git" => method = Some(FetchMethod::Git),
                "--hg" => method = Some(FetchMethod::Hg),
                flag if flag.starts_with("--") => {
                    return Err(CargoLiteError::config(format!(
                        "unrecognized flag '{}' in dependency entry {:?}",
                        flag, args
                    )));
                }
                other => positional.push(other),
            }
        }

        if positional.len() > 2 {
            return Err(CargoLiteError::config(format!(
                "too many arguments in dependency entry {:?}",
                args
            )));
        }

        Ok(Self::new(
            positional.first().map(|s| s.to_string()),
            positional.get(1).map(|s| SmolStr::new(s)),
            method,
        ))
    }

    /// Package name for this source: the explicit name if given, otherwise
    /// the basename of the location with its extension stripped
    /// (`.../glfw-rs.git` becomes `glfw-rs`).
    pub fn package_name(&self) -> Result<SmolStr> {
        if let Some(name) = &self.name {
            return Ok(name.clone());
        }

        let location = self.location.as_deref().ok_or_else(|| {
            CargoLiteError::resolution("package has neither a name nor a location")
        })?;

        Path::new(location)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(SmolStr::new)
            .ok_or_else(|| {
                CargoLiteError::resolution(format!(
                    "cannot derive a package name from '{}'",
                    location
                ))
            })
    }

    /// Fetch method for this source: the explicit flag if given, else
    /// inferred from the location suffix. Inference failure is fatal.
    pub fn resolve_method(&self) -> Result<FetchMethod> {
        if let Some(method) = self.method {
            return Ok(method);
        }

        match self.location.as_deref() {
            Some(location) if location.ends_with(".git") => Ok(FetchMethod::Git),
            _ => Err(CargoLiteError::resolution(
                CargoLiteError::NO_FETCH_METHOD,
            )),
        }
    }
}
