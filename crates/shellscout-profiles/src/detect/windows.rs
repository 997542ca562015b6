use shellscout_platform::{Platform, WindowsHost};

use super::wsl::wsl_profiles;
use super::{DetectOptions, transform_to_profiles};
use crate::config::{ProfileMap, apply_overrides};
use crate::registry::ProfileSourceRegistry;
use crate::types::{CandidateProfile, ProfileArgs, SourceId, ValidatedProfile};

/// Detect Windows profiles followed by one profile per WSL distribution.
///
/// A failing WSL listing is logged and leaves the already validated
/// profiles intact.
pub async fn detect_windows_profiles(
    registry: &ProfileSourceRegistry,
    options: DetectOptions<'_>,
) -> Vec<ValidatedProfile> {
    let host = registry.host();
    registry.ensure_initialized().await;

    let builtins = if options.quick_launch_only {
        ProfileMap::new()
    } else {
        windows_builtins(host)
    };

    let merged = match options.config {
        Some(config) => apply_overrides(builtins, config.overrides_for(Platform::Windows)),
        None => builtins,
    };
    let mut profiles = transform_to_profiles(&merged, registry, &options).await;
    log::debug!("Validated {} Windows profile(s)", profiles.len());

    let show_wsl = !options.quick_launch_only
        || options
            .config
            .is_some_and(|config| config.show_quick_launch_wsl_profiles);
    if show_wsl {
        match wsl_profiles(host, options.wsl_lister()).await {
            Ok(distros) => profiles.extend(distros),
            Err(e) => log::warn!("Skipping WSL profiles: {e}"),
        }
    }

    profiles
}

fn windows_builtins(host: &WindowsHost) -> ProfileMap {
    let system32 = host.system32_path();
    let home_drive = host.home_drive.as_deref().unwrap_or("C:");

    let mut builtins = ProfileMap::new();
    builtins.insert("PowerShell", CandidateProfile::source(SourceId::PWSH));
    builtins.insert("Git Bash", CandidateProfile::source(SourceId::GIT_BASH));
    builtins.insert(
        "Cygwin",
        CandidateProfile::paths([
            format!("{home_drive}\\cygwin64\\bin\\bash.exe"),
            format!("{home_drive}\\cygwin\\bin\\bash.exe"),
        ])
        .with_args(ProfileArgs::list(["--login"])),
    );
    builtins.insert(
        "Command Prompt",
        CandidateProfile::path(format!("{system32}\\cmd.exe")),
    );
    builtins
}

#[cfg(test)]
mod tests {
    use shellscout_platform::WindowsHost;

    use super::detect_windows_profiles;
    use crate::config::{ProfileOverride, ProfileOverrides, ProfilesConfig};
    use crate::detect::DetectOptions;
    use crate::detect::wsl::testing::FakeWsl;
    use crate::registry::ProfileSourceRegistry;
    use crate::registry::testing::FixedInstallations;
    use crate::types::{CandidateProfile, ProfileArgs, SourceId, ValidatedProfile};
    use crate::validate::FileKind;
    use crate::validate::testing::FakeFileSystem;

    const LISTING: &str = "Windows Subsystem for Linux Distributions:\r\n\
                           Ubuntu (Default)\r\n\
                           \r\n\
                           docker-desktop\r\n";

    fn host(build_number: u32) -> WindowsHost {
        WindowsHost {
            windir: "C:\\Windows".to_string(),
            program_w6432: Some("C:\\Program Files".to_string()),
            program_files: Some("C:\\Program Files (x86)".to_string()),
            home_drive: Some("C:".to_string()),
            build_number,
            ..WindowsHost::default()
        }
    }

    fn registry(build_number: u32) -> ProfileSourceRegistry {
        ProfileSourceRegistry::new(
            host(build_number),
            FixedInstallations::new(&[(
                "PowerShell 7",
                "C:\\Program Files\\PowerShell\\7\\pwsh.exe",
            )]),
        )
    }

    fn machine() -> FakeFileSystem {
        FakeFileSystem::default()
            .with_file("C:\\Program Files\\PowerShell\\7\\pwsh.exe", FileKind::File)
            .with_file("C:\\Program Files (x86)\\Git\\usr\\bin\\bash.exe", FileKind::File)
            .with_file("C:\\cygwin\\bin\\bash.exe", FileKind::File)
            .with_file("C:\\Windows\\System32\\cmd.exe", FileKind::File)
    }

    fn names(profiles: &[ValidatedProfile]) -> Vec<&str> {
        profiles.iter().map(|p| p.profile_name.as_str()).collect()
    }

    #[tokio::test]
    async fn builtins_then_wsl_distributions() {
        let fs = machine();
        let wsl = FakeWsl(Some(LISTING));
        let options = DetectOptions {
            fs: Some(&fs),
            wsl: Some(&wsl),
            ..DetectOptions::default()
        };

        let profiles = detect_windows_profiles(&registry(19045), options).await;

        assert_eq!(
            names(&profiles),
            ["PowerShell", "Git Bash", "Cygwin", "Command Prompt", "Ubuntu (WSL)"]
        );
        assert_eq!(
            profiles[1].path,
            "C:\\Program Files (x86)\\Git\\usr\\bin\\bash.exe"
        );
        assert_eq!(profiles[1].args, Some(ProfileArgs::list(["--login"])));
        assert_eq!(profiles[2].path, "C:\\cygwin\\bin\\bash.exe");
        assert_eq!(profiles[4].path, "C:\\Windows\\System32\\wsl.exe");
    }

    #[tokio::test]
    async fn missing_shells_are_left_out() {
        let fs =
            FakeFileSystem::default().with_file("C:\\Windows\\System32\\cmd.exe", FileKind::File);
        let wsl = FakeWsl(Some(LISTING));
        let options = DetectOptions {
            fs: Some(&fs),
            wsl: Some(&wsl),
            ..DetectOptions::default()
        };

        let profiles = detect_windows_profiles(&registry(19045), options).await;

        assert_eq!(names(&profiles), ["Command Prompt", "Ubuntu (WSL)"]);
    }

    #[tokio::test]
    async fn wsl_failure_keeps_validated_profiles() {
        let fs = machine();
        let wsl = FakeWsl(None);
        let options = DetectOptions {
            fs: Some(&fs),
            wsl: Some(&wsl),
            ..DetectOptions::default()
        };

        let profiles = detect_windows_profiles(&registry(19045), options).await;

        assert_eq!(profiles.len(), 4);
    }

    #[tokio::test]
    async fn legacy_builds_list_no_distributions() {
        let fs = machine();
        let wsl = FakeWsl(Some(LISTING));
        let options = DetectOptions {
            fs: Some(&fs),
            wsl: Some(&wsl),
            ..DetectOptions::default()
        };

        let profiles = detect_windows_profiles(&registry(15063), options).await;

        assert!(!names(&profiles).contains(&"Ubuntu (WSL)"));
    }

    #[tokio::test]
    async fn quick_launch_without_opt_in_is_empty() {
        let fs = machine();
        let wsl = FakeWsl(Some(LISTING));
        let options = DetectOptions {
            quick_launch_only: true,
            fs: Some(&fs),
            wsl: Some(&wsl),
            ..DetectOptions::default()
        };

        let profiles = detect_windows_profiles(&registry(19045), options).await;

        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn quick_launch_with_wsl_opt_in_lists_only_distributions() {
        let fs = machine();
        let wsl = FakeWsl(Some(LISTING));
        let config = ProfilesConfig {
            show_quick_launch_wsl_profiles: true,
            ..ProfilesConfig::default()
        };
        let options = DetectOptions {
            quick_launch_only: true,
            config: Some(&config),
            fs: Some(&fs),
            wsl: Some(&wsl),
            ..DetectOptions::default()
        };

        let profiles = detect_windows_profiles(&registry(19045), options).await;

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].profile_name, "Ubuntu (WSL)");
        assert_eq!(profiles[0].args, Some(ProfileArgs::list(["-d", "Ubuntu"])));
    }

    #[tokio::test]
    async fn overrides_remove_replace_and_add() {
        let fs = machine().with_file("D:\\msys64\\usr\\bin\\bash.exe", FileKind::File);
        let wsl = FakeWsl(Some("header\r\n"));
        let config = ProfilesConfig {
            windows: ProfileOverrides::new()
                .with("Cygwin", ProfileOverride::Remove)
                .with(
                    "Command Prompt",
                    ProfileOverride::Set(
                        CandidateProfile::path("C:\\Windows\\System32\\cmd.exe")
                            .with_args(ProfileArgs::Single("/k echo hi".to_string())),
                    ),
                )
                .with(
                    "MSYS2",
                    ProfileOverride::Set(CandidateProfile::path("D:\\msys64\\usr\\bin\\bash.exe")),
                ),
            ..ProfilesConfig::default()
        };
        let options = DetectOptions {
            config: Some(&config),
            fs: Some(&fs),
            wsl: Some(&wsl),
            ..DetectOptions::default()
        };

        let profiles = detect_windows_profiles(&registry(19045), options).await;

        assert_eq!(
            names(&profiles),
            ["PowerShell", "Git Bash", "Command Prompt", "MSYS2"]
        );
        assert_eq!(
            profiles[2].args,
            Some(ProfileArgs::Single("/k echo hi".to_string()))
        );
    }

    #[tokio::test]
    async fn source_override_args_replace_source_defaults() {
        let fs = machine();
        let wsl = FakeWsl(Some("header\r\n"));
        let config = ProfilesConfig {
            windows: ProfileOverrides::new().with(
                "Git Bash",
                ProfileOverride::Set(
                    CandidateProfile::source(SourceId::GIT_BASH)
                        .with_args(ProfileArgs::Single("-i".to_string())),
                ),
            ),
            ..ProfilesConfig::default()
        };
        let options = DetectOptions {
            config: Some(&config),
            fs: Some(&fs),
            wsl: Some(&wsl),
            ..DetectOptions::default()
        };

        let profiles = detect_windows_profiles(&registry(19045), options).await;

        assert_eq!(profiles[1].profile_name, "Git Bash");
        assert_eq!(
            profiles[1].path,
            "C:\\Program Files (x86)\\Git\\usr\\bin\\bash.exe"
        );
        assert_eq!(profiles[1].args, Some(ProfileArgs::Single("-i".to_string())));
    }

    #[tokio::test]
    async fn unknown_source_is_skipped() {
        let fs = machine();
        let wsl = FakeWsl(Some("header\r\n"));
        let config = ProfilesConfig {
            windows: ProfileOverrides::new().with(
                "Nushell",
                ProfileOverride::Set(CandidateProfile::source(SourceId::new("Nu"))),
            ),
            ..ProfilesConfig::default()
        };
        let options = DetectOptions {
            config: Some(&config),
            fs: Some(&fs),
            wsl: Some(&wsl),
            ..DetectOptions::default()
        };

        let profiles = detect_windows_profiles(&registry(19045), options).await;

        assert_eq!(profiles.len(), 4);
        assert!(!names(&profiles).contains(&"Nushell"));
    }
}
