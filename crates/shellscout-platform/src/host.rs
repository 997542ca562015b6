use serde::{Deserialize, Serialize};

/// First Windows build (1709, Fall Creators Update) that ships `wsl.exe`.
pub const WSL_EXE_MIN_BUILD: u32 = 16299;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    #[serde(rename = "osx")]
    MacOs,
}

impl Platform {
    #[must_use]
    pub fn current() -> Self {
        #[cfg(target_os = "windows")]
        {
            Platform::Windows
        }
        #[cfg(target_os = "macos")]
        {
            Platform::MacOs
        }
        #[cfg(all(not(target_os = "windows"), not(target_os = "macos")))]
        {
            Platform::Linux
        }
    }
}

/// Environment-derived facts about a Windows host that decide where shells
/// are looked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowsHost {
    pub windir: String,
    pub program_w6432: Option<String>,
    pub program_files: Option<String>,
    pub program_files_x86: Option<String>,
    pub local_app_data: Option<String>,
    pub user_profile: Option<String>,
    pub home_drive: Option<String>,
    /// Set when `PROCESSOR_ARCHITEW6432` exists: a 32-bit process on 64-bit Windows.
    pub is_wow64: bool,
    pub build_number: u32,
}

impl WindowsHost {
    /// Capture the host from the process environment and `cmd /c ver`.
    #[must_use]
    pub fn current() -> Self {
        Self::from_env(|key| std::env::var(key).ok(), query_build_number())
    }

    pub fn from_env<F>(lookup: F, build_number: u32) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            windir: non_empty("windir").unwrap_or_else(|| "C:\\Windows".to_string()),
            program_w6432: non_empty("ProgramW6432"),
            program_files: non_empty("ProgramFiles"),
            program_files_x86: non_empty("ProgramFiles(x86)"),
            local_app_data: non_empty("LocalAppData"),
            user_profile: non_empty("USERPROFILE"),
            home_drive: non_empty("HOMEDRIVE"),
            is_wow64: lookup("PROCESSOR_ARCHITEW6432").is_some(),
            build_number,
        }
    }

    /// `%windir%\Sysnative` for a WOW64 process, `%windir%\System32` otherwise.
    #[must_use]
    pub fn system32_path(&self) -> String {
        let dir = if self.is_wow64 { "Sysnative" } else { "System32" };
        format!("{}\\{dir}", self.windir)
    }

    #[must_use]
    pub fn prefers_wsl_exe(&self) -> bool {
        self.build_number >= WSL_EXE_MIN_BUILD
    }

    /// `wsl.exe` on builds that have it, the legacy `bash.exe` launcher before.
    #[must_use]
    pub fn wsl_launcher_path(&self) -> String {
        let exe = if self.prefers_wsl_exe() {
            "wsl.exe"
        } else {
            "bash.exe"
        };
        format!("{}\\{exe}", self.system32_path())
    }
}

#[cfg(windows)]
fn query_build_number() -> u32 {
    use crate::commands::HideWindow;

    let output = std::process::Command::new("cmd")
        .args(["/c", "ver"])
        .hide_window()
        .output();

    match output {
        Ok(output) if output.status.success() => {
            parse_windows_build(&String::from_utf8_lossy(&output.stdout)).unwrap_or_else(|| {
                log::debug!("Could not parse Windows build from `ver` output");
                0
            })
        }
        Ok(output) => {
            log::debug!("`ver` exited with {}", output.status);
            0
        }
        Err(e) => {
            log::debug!("Failed to run `ver`: {e}");
            0
        }
    }
}

#[cfg(not(windows))]
fn query_build_number() -> u32 {
    0
}

/// Pull the build component out of `ver` output such as
/// `Microsoft Windows [Version 10.0.22631.4317]`.
#[must_use]
pub fn parse_windows_build(ver_output: &str) -> Option<u32> {
    let start = ver_output.find("[Version ")? + "[Version ".len();
    let rest = &ver_output[start..];
    let version = &rest[..rest.find(']')?];
    version.split('.').nth(2)?.trim().parse().ok()
}
