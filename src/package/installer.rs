use crate::build::Orchestrator;
use crate::package::fetcher::Fetcher;
use crate::package::manifest::Manifest;
use crate::package::source::PackageSource;
use crate::result::{CargoLiteError, Result};
use crate::store::Store;
use smol_str::SmolStr;

/** Runs the full install pipeline: fetch, load, install deps, build
 *
 * Dependencies are installed depth first, in manifest order, each one as a
 * complete install request of its own, so a dependency's whole subtree
 * finishes before its dependent's build step starts. The repository store
 * deduplicates fetches by name, but each occurrence of a dependency goes
 * through the build orchestrator again; only the artifact cache check keeps
 * repeat builds cheap.
 *
 * The recursion carries the chain of package names currently being
 * installed, so a dependency cycle is reported as an error instead of
 * recursing without bound.
 */
pub struct Installer {
    store: Store,
    fetcher: Fetcher,
}

impl Installer {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            fetcher: Fetcher::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Installs a package and everything it depends on.
    pub async fn install(&self, source: &PackageSource) -> Result<()> {
        let mut in_flight = Vec::new();
        self.install_source(source, &mut in_flight).await
    }

    /// Installs only the dependencies of an already-loaded manifest, for
    /// in-place builds that do not install the package itself.
    pub async fn install_deps(&self, manifest: &Manifest) -> Result<()> {
        let mut in_flight = Vec::new();
        self.install_deps_inner(manifest, &mut in_flight).await
    }

    async fn install_source(
        &self,
        source: &PackageSource,
        in_flight: &mut Vec<SmolStr>,
    ) -> Result<()> {
        let path = self.fetcher.fetch(&self.store, source).await?;

        // The store entry name is the canonical package identity.
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(SmolStr::new)
            .ok_or_else(|| {
                CargoLiteError::resolution(format!(
                    "store entry has no usable name: {}",
                    path.display()
                ))
            })?;

        if in_flight.contains(&name) {
            let mut chain: Vec<&str> = in_flight.iter().map(SmolStr::as_str).collect();
            chain.push(&name);
            return Err(CargoLiteError::resolution(format!(
                "dependency cycle detected: {}",
                chain.join(" -> ")
            )));
        }
        in_flight.push(name.clone());

        log::info!("installing {} from {}", name, path.display());
        let manifest = Manifest::load(&path).await?;
        self.install_deps_inner(&manifest, in_flight).await?;
        Orchestrator::new(&self.store).build(&manifest, &path).await?;

        in_flight.pop();
        log::info!("installed {}", name);
        Ok(())
    }

    async fn install_deps_inner(
        &self,
        manifest: &Manifest,
        in_flight: &mut Vec<SmolStr>,
    ) -> Result<()> {
        for dep in &manifest.deps {
            let source = PackageSource::from_dep_args(dep)?;
            Box::pin(self.install_source(&source, in_flight)).await?;
        }
        Ok(())
    }
}
