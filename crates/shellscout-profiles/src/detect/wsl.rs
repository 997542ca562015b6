use async_trait::async_trait;
use shellscout_platform::{WindowsHost, WslError, list_wsl_distros_raw};
use std::path::PathBuf;

use crate::types::{ProfileArgs, ValidatedProfile};

/// Internal distributions of Docker Desktop, not meant to be opened.
const DOCKER_DESKTOP_PREFIX: &str = "docker-desktop";
const DEFAULT_MARKER: &str = " (Default)";

/// Produces the decoded output of `wsl.exe -l`.
#[async_trait]
pub trait WslLister: Send + Sync {
    async fn list(&self, host: &WindowsHost) -> Result<String, WslError>;
}

/// Runs `<system32>\wsl.exe -l`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WslExe;

#[async_trait]
impl WslLister for WslExe {
    async fn list(&self, host: &WindowsHost) -> Result<String, WslError> {
        let exe = PathBuf::from(format!("{}\\wsl.exe", host.system32_path()));
        list_wsl_distros_raw(&exe).await
    }
}

/// One profile per installed WSL distribution.
///
/// Empty when the host predates `wsl.exe`.
///
/// # Errors
/// Returns [`WslError`] when the listing command fails; unlike a missing
/// profile path this is not silently skipped.
pub async fn wsl_profiles(
    host: &WindowsHost,
    lister: &dyn WslLister,
) -> Result<Vec<ValidatedProfile>, WslError> {
    if !host.prefers_wsl_exe() {
        log::debug!(
            "Windows build {} predates wsl.exe, skipping distributions",
            host.build_number
        );
        return Ok(Vec::new());
    }

    let listing = lister.list(host).await?;
    Ok(parse_wsl_distros(&listing, &host.wsl_launcher_path()))
}

/// Turn `wsl.exe -l` output into profiles launched through `launcher`.
///
/// The first non-blank line is the "Windows Subsystem for Linux
/// Distributions:" header.
#[must_use]
pub fn parse_wsl_distros(listing: &str, launcher: &str) -> Vec<ValidatedProfile> {
    listing
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .skip(1)
        .filter_map(|line| {
            let name = line.strip_suffix(DEFAULT_MARKER).unwrap_or(line).trim();
            if name.is_empty() || name.starts_with(DOCKER_DESKTOP_PREFIX) {
                return None;
            }
            Some(ValidatedProfile {
                profile_name: format!("{name} (WSL)"),
                path: launcher.to_string(),
                args: Some(ProfileArgs::list(["-d", name])),
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use shellscout_platform::{WindowsHost, WslError};

    use super::WslLister;

    pub(crate) struct FakeWsl(pub(crate) Option<&'static str>);

    #[async_trait]
    impl WslLister for FakeWsl {
        async fn list(&self, _host: &WindowsHost) -> Result<String, WslError> {
            self.0
                .map(str::to_string)
                .ok_or(WslError::ListFailed { source: None })
        }
    }
}
