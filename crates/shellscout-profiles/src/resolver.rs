use std::path::PathBuf;

/// The folder a terminal would open in, for resolvers that expand
/// workspace-relative placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    pub name: String,
    pub path: PathBuf,
}

/// Expands placeholders in a candidate path before it is validated.
///
/// Implementations return the input unchanged when there is nothing to
/// substitute.
pub trait VariableResolver: Send + Sync {
    fn resolve(&self, workspace: Option<&WorkspaceFolder>, value: &str) -> String;
}

impl<F> VariableResolver for F
where
    F: Fn(Option<&WorkspaceFolder>, &str) -> String + Send + Sync,
{
    fn resolve(&self, workspace: Option<&WorkspaceFolder>, value: &str) -> String {
        self(workspace, value)
    }
}
