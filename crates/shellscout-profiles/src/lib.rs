#![allow(clippy::missing_errors_doc)]

mod config;
mod detect;
mod error;
mod pwsh;
mod registry;
mod resolver;
mod types;
mod validate;

pub use config::{ProfileMap, ProfileOverride, ProfileOverrides, ProfilesConfig, apply_overrides};
pub use detect::{
    DetectOptions, SYSTEM_SHELLS_FILE, WslExe, WslLister, detect_available_profiles,
    detect_unix_profiles, detect_windows_profiles, parse_system_shells, parse_wsl_distros,
    transform_to_profiles, wsl_profiles,
};
pub use error::DetectError;
pub use pwsh::PwshInstallations;
pub use registry::{InstallationEnumerator, ProfileSourceRegistry, ShellInstallation};
pub use resolver::{VariableResolver, WorkspaceFolder};
pub use shellscout_platform::{Platform, WindowsHost};
pub use types::{CandidateProfile, PotentialSource, ProfileArgs, SourceId, ValidatedProfile};
pub use validate::{
    FileKind, FileSystem, RealFileSystem, is_bare_command, normalize_path, validate_profile_paths,
};
