use shellscout_profiles::{VariableResolver, WorkspaceFolder};

/// Expands `${env:NAME}`, `${workspaceFolder}` and `${workspaceFolderBasename}`.
///
/// Unknown or unset variables are left in place so the path simply fails
/// validation.
pub struct EnvVariableResolver<F = fn(&str) -> Option<String>> {
    lookup: F,
}

impl EnvVariableResolver {
    #[must_use]
    pub fn from_process_env() -> Self {
        Self {
            lookup: |name| std::env::var(name).ok(),
        }
    }
}

impl<F> EnvVariableResolver<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    #[must_use]
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    fn variable(&self, workspace: Option<&WorkspaceFolder>, name: &str) -> Option<String> {
        if let Some(var) = name.strip_prefix("env:") {
            return (self.lookup)(var);
        }
        let folder = workspace?;
        match name {
            "workspaceFolder" => Some(folder.path.to_string_lossy().into_owned()),
            "workspaceFolderBasename" => Some(folder.name.clone()),
            _ => None,
        }
    }
}

impl<F> VariableResolver for EnvVariableResolver<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn resolve(&self, workspace: Option<&WorkspaceFolder>, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                rest = &rest[start..];
                break;
            };
            let name = &after[..end];
            match self.variable(workspace, name) {
                Some(expanded) => out.push_str(&expanded),
                None => out.push_str(&rest[start..start + 2 + end + 1]),
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }
}
