mod unix;
mod windows;
mod wsl;

use shellscout_platform::Platform;

use crate::config::{ProfileMap, ProfilesConfig};
use crate::error::DetectError;
use crate::registry::ProfileSourceRegistry;
use crate::resolver::{VariableResolver, WorkspaceFolder};
use crate::types::{CandidateProfile, ProfileArgs, ValidatedProfile};
use crate::validate::{FileSystem, RealFileSystem, validate_profile_paths};

pub use unix::{SYSTEM_SHELLS_FILE, detect_unix_profiles, parse_system_shells};
pub use windows::detect_windows_profiles;
pub use wsl::{WslExe, WslLister, parse_wsl_distros, wsl_profiles};

/// Inputs for one detection pass. Everything is optional; the defaults read
/// the real filesystem, run the real `wsl.exe` and apply no overrides.
#[derive(Clone, Copy, Default)]
pub struct DetectOptions<'a> {
    /// Restrict to the quick-launch subset: no built-in candidates.
    pub quick_launch_only: bool,
    pub config: Option<&'a ProfilesConfig>,
    pub resolver: Option<&'a dyn VariableResolver>,
    pub workspace: Option<&'a WorkspaceFolder>,
    pub fs: Option<&'a dyn FileSystem>,
    pub wsl: Option<&'a dyn WslLister>,
    /// Lines to use instead of reading `/etc/shells`.
    pub test_shells: Option<&'a [String]>,
}

impl<'a> DetectOptions<'a> {
    fn file_system(&self) -> &'a dyn FileSystem {
        self.fs.unwrap_or(&RealFileSystem)
    }

    fn wsl_lister(&self) -> &'a dyn WslLister {
        self.wsl.unwrap_or(&WslExe)
    }
}

/// Detect the profiles usable on this platform.
///
/// # Errors
/// Returns [`DetectError::SystemShells`] when `/etc/shells` cannot be read
/// on a POSIX host. Individual profiles that fail validation and a failing
/// WSL listing never make this return an error.
pub async fn detect_available_profiles(
    registry: &ProfileSourceRegistry,
    options: DetectOptions<'_>,
) -> Result<Vec<ValidatedProfile>, DetectError> {
    match Platform::current() {
        Platform::Windows => Ok(detect_windows_profiles(registry, options).await),
        platform => detect_unix_profiles(registry, platform, options).await,
    }
}

/// Resolve and validate merged entries in order, dropping the ones that
/// cannot be found.
pub async fn transform_to_profiles(
    entries: &ProfileMap,
    registry: &ProfileSourceRegistry,
    options: &DetectOptions<'_>,
) -> Vec<ValidatedProfile> {
    let fs = options.file_system();
    let mut profiles = Vec::new();

    for (name, candidate) in entries.iter() {
        let (paths, args) = match candidate {
            CandidateProfile::Source { id, args } => {
                let Some(source) = registry.get(id) else {
                    log::trace!("No profile source \"{id}\" for profile \"{name}\"");
                    continue;
                };
                let args = args
                    .clone()
                    .or_else(|| source.args.clone().map(ProfileArgs::List));
                (source.paths.as_slice(), args)
            }
            CandidateProfile::Path { paths, args } => (paths.as_slice(), args.clone()),
        };

        let resolved: Vec<String> = match options.resolver {
            Some(resolver) => paths
                .iter()
                .map(|path| {
                    let resolved = resolver.resolve(options.workspace, path);
                    if resolved.is_empty() {
                        path.clone()
                    } else {
                        resolved
                    }
                })
                .collect(),
            None => paths.to_vec(),
        };

        match validate_profile_paths(name, &resolved, args.as_ref(), fs).await {
            Some(profile) => profiles.push(profile),
            None => log::trace!("No valid path for profile \"{name}\" in {resolved:?}"),
        }
    }

    profiles
}
