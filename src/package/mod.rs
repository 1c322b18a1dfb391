pub mod fetcher;
pub mod installer;
pub mod manifest;
pub mod source;

pub use fetcher::Fetcher;
pub use installer::Installer;
pub use manifest::{BuildSpec, Manifest, MANIFEST_FILE};
pub use source::{FetchMethod, PackageSource};
