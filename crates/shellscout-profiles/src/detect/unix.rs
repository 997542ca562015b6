use shellscout_platform::Platform;
use std::path::Path;

use super::{DetectOptions, transform_to_profiles};
use crate::config::{ProfileMap, apply_overrides};
use crate::error::DetectError;
use crate::registry::ProfileSourceRegistry;
use crate::types::{CandidateProfile, ValidatedProfile};

pub const SYSTEM_SHELLS_FILE: &str = "/etc/shells";

/// Detect the login shells listed in `/etc/shells`, named by file name.
///
/// # Errors
/// Returns [`DetectError::SystemShells`] when the shells file is needed and
/// cannot be read.
pub async fn detect_unix_profiles(
    registry: &ProfileSourceRegistry,
    platform: Platform,
    options: DetectOptions<'_>,
) -> Result<Vec<ValidatedProfile>, DetectError> {
    let mut detected = ProfileMap::new();

    if !options.quick_launch_only {
        let shells = match options.test_shells {
            Some(lines) => parse_system_shells(lines.iter().map(String::as_str)),
            None => read_system_shells(Path::new(SYSTEM_SHELLS_FILE)).await?,
        };
        for shell in shells {
            detected.insert(shell_name(&shell), CandidateProfile::path(shell));
        }
    }

    let merged = match options.config {
        Some(config) => apply_overrides(detected, config.overrides_for(platform)),
        None => detected,
    };

    let profiles = transform_to_profiles(&merged, registry, &options).await;
    log::debug!("Validated {} {platform:?} profile(s)", profiles.len());
    Ok(profiles)
}

async fn read_system_shells(path: &Path) -> Result<Vec<String>, DetectError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DetectError::SystemShells {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_system_shells(contents.lines()))
}

/// Shell paths from `/etc/shells`-style lines, skipping blanks and comments.
pub fn parse_system_shells<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn shell_name(shell: &str) -> String {
    Path::new(shell)
        .file_name()
        .map_or_else(|| shell.to_string(), |name| name.to_string_lossy().into_owned())
}
