pub mod build;
pub mod install;

use crate::result::Result;
use smol_str::SmolStr;

#[derive(Debug)]
pub enum CommandType {
    Install {
        git: bool,
        hg: bool,
        local: bool,
        path: Option<String>,
        package: Option<SmolStr>,
    },
    Build {
        path: Option<String>,
    },
}

impl CommandType {
    pub async fn execute(self) -> Result<()> {
        match self {
            CommandType::Install {
                git,
                hg,
                local,
                path,
                package,
            } => install::execute(git, hg, local, path, package).await,
            CommandType::Build { path } => build::execute(path.as_deref()).await,
        }
    }
}

#[derive(Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    pub async fn install_package(
        &mut self,
        git: bool,
        hg: bool,
        local: bool,
        path: Option<String>,
        package: Option<String>,
    ) -> Result<()> {
        CommandType::Install {
            git,
            hg,
            local,
            path,
            package: package.map(|s| s.into()),
        }
        .execute()
        .await
    }

    pub async fn build_package(&mut self, path: Option<String>) -> Result<()> {
        CommandType::Build { path }.execute().await
    }
}
