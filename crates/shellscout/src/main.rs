mod logging;
mod resolver;
mod settings;

use clap::Parser;
use shellscout_profiles::{
    DetectOptions, ProfileSourceRegistry, ValidatedProfile, WorkspaceFolder,
    detect_available_profiles,
};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::logging::init_logging;
use crate::resolver::EnvVariableResolver;
use crate::settings::AppSettings;

/// shellscout - find the terminal shells available on this machine
#[derive(Parser)]
#[command(name = "shellscout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Only list configured overrides (and WSL distributions when enabled)
    #[arg(long)]
    quick_launch: bool,

    /// Folder substituted for ${workspaceFolder} in profile paths
    #[arg(long, value_name = "PATH")]
    workspace: Option<PathBuf>,

    /// Read settings from this file instead of the user config directory
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Log detection steps to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.settings {
        Some(path) => AppSettings::load_from(path),
        None => AppSettings::load(),
    };
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("shellscout: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&settings, cli.verbose);

    match run(&cli, &settings).await {
        Ok(profiles) => match serde_json::to_string_pretty(&profiles) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("shellscout: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            log::error!("Profile detection failed: {e}");
            eprintln!("shellscout: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    cli: &Cli,
    settings: &AppSettings,
) -> Result<Vec<ValidatedProfile>, shellscout_profiles::DetectError> {
    let registry = ProfileSourceRegistry::for_current_host();
    let resolver = EnvVariableResolver::from_process_env();
    let workspace = cli
        .workspace
        .clone()
        .or_else(|| settings.workspace_folder.clone())
        .map(workspace_folder);

    let options = DetectOptions {
        quick_launch_only: cli.quick_launch || settings.quick_launch_only,
        config: Some(&settings.profiles),
        resolver: Some(&resolver),
        workspace: workspace.as_ref(),
        ..DetectOptions::default()
    };

    let profiles = detect_available_profiles(&registry, options).await?;
    log::info!("Detected {} profile(s)", profiles.len());
    Ok(profiles)
}

fn workspace_folder(path: PathBuf) -> WorkspaceFolder {
    let name = path
        .file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
        .into_owned();
    WorkspaceFolder { name, path }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::path::PathBuf;

    use super::{Cli, workspace_folder};

    #[test]
    fn workspace_is_named_after_its_last_component() {
        let folder = workspace_folder(PathBuf::from("/src/api"));
        assert_eq!(folder.name, "api");
        assert_eq!(folder.path, PathBuf::from("/src/api"));
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from(["shellscout", "--quick-launch", "-v", "--workspace", "/src"]);

        assert!(cli.quick_launch);
        assert!(cli.verbose);
        assert_eq!(cli.workspace, Some(PathBuf::from("/src")));
        assert!(cli.settings.is_none());
    }
}
