use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::types::{ProfileArgs, ValidatedProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Symlink,
    Directory,
    Other,
}

impl FileKind {
    #[must_use]
    pub fn from_file_type(file_type: std::fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_file() {
            Self::File
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }

    fn is_launchable(self) -> bool {
        matches!(self, Self::File | Self::Symlink)
    }
}

/// The two stat flavours the validator needs; swapped out in tests.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Follows symlinks.
    async fn stat(&self, path: &Path) -> io::Result<FileKind>;
    /// Does not follow symlinks.
    async fn lstat(&self, path: &Path) -> io::Result<FileKind>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

#[async_trait]
impl FileSystem for RealFileSystem {
    async fn stat(&self, path: &Path) -> io::Result<FileKind> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(FileKind::from_file_type(metadata.file_type()))
    }

    async fn lstat(&self, path: &Path) -> io::Result<FileKind> {
        let metadata = tokio::fs::symlink_metadata(path).await?;
        Ok(FileKind::from_file_type(metadata.file_type()))
    }
}

/// A name with no directory part (`pwsh`, `cmd.exe`) is left for the
/// launcher's own `PATH` search.
#[must_use]
pub fn is_bare_command(path: &str) -> bool {
    !path.contains(['/', '\\'])
}

/// Lexically drop `.` and fold `..` components.
#[must_use]
pub fn normalize_path(path: &str) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let ends_in_normal =
                    matches!(normalized.components().next_back(), Some(Component::Normal(_)));
                if ends_in_normal {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Return a profile for the first entry of `paths` that exists as a file or
/// symlink.
///
/// Candidates are tried strictly in order. Each one gets a `stat` and, when
/// that fails or reports another file type, an `lstat`: some Windows
/// locations (app execution aliases under `WindowsApps`) refuse `stat` with a
/// permission error but answer `lstat`. The reported path is the candidate
/// as given, never a link target.
pub async fn validate_profile_paths(
    profile_name: &str,
    paths: &[String],
    args: Option<&ProfileArgs>,
    fs: &dyn FileSystem,
) -> Option<ValidatedProfile> {
    for path in paths {
        if path.is_empty() {
            continue;
        }

        if is_bare_command(path) || is_launchable(fs, &normalize_path(path)).await {
            return Some(ValidatedProfile {
                profile_name: profile_name.to_string(),
                path: path.clone(),
                args: args.cloned(),
            });
        }
    }

    None
}

async fn is_launchable(fs: &dyn FileSystem, path: &Path) -> bool {
    match fs.stat(path).await {
        Ok(kind) if kind.is_launchable() => return true,
        Ok(kind) => log::trace!("stat {}: {kind:?} is not launchable", path.display()),
        Err(e) => log::trace!("stat {} failed: {e}", path.display()),
    }

    match fs.lstat(path).await {
        Ok(kind) if kind.is_launchable() => true,
        Ok(kind) => {
            log::trace!("lstat {}: {kind:?} is not launchable", path.display());
            false
        }
        Err(e) => {
            log::trace!("lstat {} failed: {e}", path.display());
            false
        }
    }
}
