use crate::commands::CommandExecutor;
use crate::result::Result;
use clap::Parser;

#[derive(Parser)]
#[command(name = "cargo-lite")]
#[command(about = "A dirt simple package manager for Rust crates")]
#[command(version = "0.1.0")]
#[command(arg_required_else_help = true)]
#[command(
    help_template = "{before-help}{name} v{version}\n\n{about-with-newline}\n{usage-heading} {usage}\n\n{all-args}{after-help}"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
pub enum Commands {
    #[command(about = "Fetch, build, and install a package and its dependencies")]
    Install {
        #[arg(long, help = "Fetch source using git (inferred if the path ends in .git)")]
        git: bool,

        #[arg(long, conflicts_with = "git", help = "Fetch source using hg (never inferred)")]
        hg: bool,

        #[arg(
            long,
            conflicts_with_all = ["git", "hg"],
            help = "Copy source from a local directory"
        )]
        local: bool,

        #[arg(help = "Package location: local path or clone URL (defaults to the current directory)")]
        path: Option<String>,

        #[arg(help = "Override the package name derived from the location")]
        package: Option<String>,
    },

    #[command(about = "Build the package in a directory without installing it")]
    Build {
        #[arg(help = "Package directory (defaults to the current directory)")]
        path: Option<String>,
    },
}

impl Default for Cli {
    fn default() -> Self {
        Self::parse()
    }
}

impl Cli {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn execute(self) -> Result<()> {
        let mut executor = CommandExecutor::new();

        match self.command {
            Commands::Install {
                git,
                hg,
                local,
                path,
                package,
            } => executor.install_package(git, hg, local, path, package).await,
            Commands::Build { path } => executor.build_package(path).await,
        }
    }
}
