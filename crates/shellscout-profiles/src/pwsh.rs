use async_trait::async_trait;
use shellscout_platform::WindowsHost;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::registry::{InstallationEnumerator, ShellInstallation};

/// Enumerates PowerShell installations on a Windows host.
///
/// Order: `pwsh` on `PATH`, versioned installs under Program Files (newest
/// first, then x86), the dotnet global tool, the Store alias, and finally
/// Windows PowerShell 5.1. Duplicate paths are reported once.
pub struct PwshInstallations {
    host: WindowsHost,
    search_path: bool,
}

impl PwshInstallations {
    #[must_use]
    pub fn new(host: WindowsHost) -> Self {
        Self {
            host,
            search_path: true,
        }
    }

    /// Skip the `PATH` lookup, so only host-derived locations are considered.
    #[must_use]
    pub fn without_path_search(mut self) -> Self {
        self.search_path = false;
        self
    }
}

#[async_trait]
impl InstallationEnumerator for PwshInstallations {
    async fn installations(&self) -> Vec<ShellInstallation> {
        let mut found = Vec::new();

        if self.search_path
            && let Ok(path) = which::which("pwsh")
        {
            found.push(install("PowerShell", &path));
        }

        let x64_root = self
            .host
            .program_w6432
            .as_ref()
            .or(self.host.program_files.as_ref());
        if let Some(root) = x64_root {
            found.extend(versioned_installs(Path::new(root), "").await);
        }
        if let Some(root) = &self.host.program_files_x86 {
            found.extend(versioned_installs(Path::new(root), " (x86)").await);
        }

        let fixed = [
            self.host.user_profile.as_ref().map(|home| {
                (
                    "PowerShell .NET Core",
                    Path::new(home).join(".dotnet").join("tools").join("pwsh.exe"),
                )
            }),
            self.host.local_app_data.as_ref().map(|local| {
                (
                    "PowerShell (Store)",
                    Path::new(local)
                        .join("Microsoft")
                        .join("WindowsApps")
                        .join("pwsh.exe"),
                )
            }),
            Some((
                "Windows PowerShell",
                Path::new(&self.host.system32_path())
                    .join("WindowsPowerShell")
                    .join("v1.0")
                    .join("powershell.exe"),
            )),
        ];
        for (name, path) in fixed.into_iter().flatten() {
            if exists(&path).await {
                found.push(install(name, &path));
            }
        }

        dedup_by_path(found)
    }
}

fn install(display_name: &str, path: &Path) -> ShellInstallation {
    ShellInstallation {
        display_name: display_name.to_string(),
        exe_path: path.to_string_lossy().into_owned(),
    }
}

/// Store execution aliases only answer `lstat`.
async fn exists(path: &Path) -> bool {
    tokio::fs::symlink_metadata(path).await.is_ok()
}

/// `<root>\PowerShell\<version>\pwsh.exe`, newest major version first.
async fn versioned_installs(root: &Path, suffix: &str) -> Vec<ShellInstallation> {
    let base = root.join("PowerShell");
    let Ok(mut entries) = tokio::fs::read_dir(&base).await else {
        return Vec::new();
    };

    let mut versions: Vec<(u32, String, PathBuf)> = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(major) = name.split('-').next().and_then(|m| m.parse::<u32>().ok()) else {
            continue;
        };
        let exe = entry.path().join("pwsh.exe");
        if exists(&exe).await {
            versions.push((major, name, exe));
        }
    }

    versions.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    versions
        .into_iter()
        .map(|(_, name, exe)| install(&format!("PowerShell {name}{suffix}"), &exe))
        .collect()
}

fn dedup_by_path(installs: Vec<ShellInstallation>) -> Vec<ShellInstallation> {
    let mut seen = HashSet::new();
    installs
        .into_iter()
        .filter(|install| seen.insert(install.exe_path.to_lowercase()))
        .collect()
}
