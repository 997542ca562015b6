use async_trait::async_trait;
use shellscout_platform::WindowsHost;
use std::collections::HashMap;
use tokio::sync::OnceCell;

use crate::pwsh::PwshInstallations;
use crate::types::{PotentialSource, SourceId};

/// One installed copy of a scripting shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInstallation {
    pub display_name: String,
    pub exe_path: String,
}

/// Finds installed scripting shells, best candidate first.
#[async_trait]
pub trait InstallationEnumerator: Send + Sync {
    async fn installations(&self) -> Vec<ShellInstallation>;
}

/// Lookup table from symbolic source ids to candidate install locations.
///
/// Owned by the caller and built at most once; concurrent first callers of
/// [`ProfileSourceRegistry::ensure_initialized`] wait on the same build.
pub struct ProfileSourceRegistry {
    host: WindowsHost,
    enumerator: Box<dyn InstallationEnumerator>,
    sources: OnceCell<HashMap<SourceId, PotentialSource>>,
}

impl ProfileSourceRegistry {
    pub fn new(host: WindowsHost, enumerator: impl InstallationEnumerator + 'static) -> Self {
        Self {
            host,
            enumerator: Box::new(enumerator),
            sources: OnceCell::new(),
        }
    }

    /// Registry for this machine, enumerating PowerShell installations.
    #[must_use]
    pub fn for_current_host() -> Self {
        let host = WindowsHost::current();
        let enumerator = PwshInstallations::new(host.clone());
        Self::new(host, enumerator)
    }

    #[must_use]
    pub fn host(&self) -> &WindowsHost {
        &self.host
    }

    pub async fn ensure_initialized(&self) {
        self.sources.get_or_init(|| self.build()).await;
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.sources.initialized()
    }

    /// `None` until [`Self::ensure_initialized`] has completed.
    #[must_use]
    pub fn get(&self, id: &SourceId) -> Option<&PotentialSource> {
        self.sources.get()?.get(id)
    }

    async fn build(&self) -> HashMap<SourceId, PotentialSource> {
        let mut sources = HashMap::new();

        sources.insert(SourceId::GIT_BASH, git_bash_source(&self.host));

        let installations = self.enumerator.installations().await;
        log::debug!("Found {} PowerShell installation(s)", installations.len());

        sources.insert(
            SourceId::PWSH,
            PotentialSource {
                profile_name: SourceId::PWSH.as_str().to_string(),
                paths: installations
                    .iter()
                    .map(|install| install.exe_path.clone())
                    .collect(),
                args: None,
            },
        );

        for install in installations {
            let id = SourceId::new(install.display_name.clone());
            if sources.contains_key(&id) {
                log::debug!(
                    "Not registering \"{}\" separately: id already taken",
                    install.display_name
                );
                continue;
            }
            sources.insert(
                id,
                PotentialSource {
                    profile_name: install.display_name,
                    paths: vec![install.exe_path],
                    args: None,
                },
            );
        }

        sources
    }
}

fn git_bash_source(host: &WindowsHost) -> PotentialSource {
    let mut paths = Vec::new();
    for root in [&host.program_w6432, &host.program_files].into_iter().flatten() {
        paths.push(format!("{root}\\Git\\bin\\bash.exe"));
        paths.push(format!("{root}\\Git\\usr\\bin\\bash.exe"));
    }
    if let Some(local_app_data) = &host.local_app_data {
        paths.push(format!("{local_app_data}\\Programs\\Git\\bin\\bash.exe"));
    }

    PotentialSource {
        profile_name: SourceId::GIT_BASH.as_str().to_string(),
        paths,
        args: Some(vec!["--login".to_string()]),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{InstallationEnumerator, ShellInstallation};

    /// Fixed installation list that counts how often it was queried.
    #[derive(Default, Clone)]
    pub(crate) struct FixedInstallations {
        pub(crate) installs: Vec<ShellInstallation>,
        pub(crate) queries: Arc<AtomicUsize>,
    }

    impl FixedInstallations {
        pub(crate) fn new(installs: &[(&str, &str)]) -> Self {
            Self {
                installs: installs
                    .iter()
                    .map(|(name, path)| ShellInstallation {
                        display_name: (*name).to_string(),
                        exe_path: (*path).to_string(),
                    })
                    .collect(),
                queries: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl InstallationEnumerator for FixedInstallations {
        async fn installations(&self) -> Vec<ShellInstallation> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.installs.clone()
        }
    }
}
