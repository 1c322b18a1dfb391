use crate::package::{FetchMethod, Installer, PackageSource};
use crate::result::{CargoLiteError, Result};
use crate::store::Store;
use indicatif::{ProgressBar, ProgressStyle};
use smol_str::SmolStr;

pub async fn execute(
    git: bool,
    hg: bool,
    local: bool,
    path: Option<String>,
    package: Option<SmolStr>,
) -> Result<()> {
    let mut cmd = InstallCommand::new();
    cmd.execute(git, hg, local, path, package).await
}

#[derive(Default)]
pub struct InstallCommand;

impl InstallCommand {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(
        &mut self,
        git: bool,
        hg: bool,
        local: bool,
        path: Option<String>,
        package: Option<SmolStr>,
    ) -> Result<()> {
        let method = if local {
            Some(FetchMethod::Local)
        } else if git {
            Some(FetchMethod::Git)
        } else if hg {
            Some(FetchMethod::Hg)
        } else {
            None
        };

        let source = PackageSource::new(path, package, method);
        let target = source
            .location
            .clone()
            .unwrap_or_else(|| "current directory".to_string());

        println!("Installing {}...", target);
        log::info!("starting install of {}", target);

        let install_spinner = ProgressBar::new_spinner();
        install_spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg}")
                .unwrap(),
        );
        install_spinner.set_message("Opening package store...");
        install_spinner.enable_steady_tick(std::time::Duration::from_millis(120));

        let store = Store::open()?;
        let installer = Installer::new(store);
        install_spinner.finish_and_clear();

        match installer.install(&source).await {
            Ok(()) => {
                println!("\nCompleted successfully!");
                println!(
                    "Artifacts are available under {}",
                    installer.store().root().join("lib").display()
                );
                log::info!("install of {} completed", target);
                Ok(())
            }
            Err(e) => {
                println!("\nInstallation failed!");
                eprintln!("Error: {}", e);
                log::error!("install of {} failed: {}", target, e);
                Err(CargoLiteError::process(format!(
                    "Failed to install {}: {}",
                    target, e
                )))
            }
        }
    }
}
