use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Name of an indirect profile source such as "PowerShell" or "Git Bash".
///
/// Ids compare case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(Cow<'static, str>);

impl SourceId {
    /// Every PowerShell installation found on the host, best first.
    pub const PWSH: SourceId = SourceId(Cow::Borrowed("PowerShell"));
    pub const GIT_BASH: SourceId = SourceId(Cow::Borrowed("Git Bash"));

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Launch arguments, kept in whichever form the user wrote them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileArgs {
    List(Vec<String>),
    Single(String),
}

impl ProfileArgs {
    pub fn list<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(args.into_iter().map(Into::into).collect())
    }
}

/// A declared profile before its paths have been checked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawProfile")]
pub enum CandidateProfile {
    /// Resolved through the profile source registry.
    Source {
        id: SourceId,
        args: Option<ProfileArgs>,
    },
    Path {
        paths: Vec<String>,
        args: Option<ProfileArgs>,
    },
}

impl CandidateProfile {
    #[must_use]
    pub fn source(id: SourceId) -> Self {
        Self::Source { id, args: None }
    }

    pub fn path(path: impl Into<String>) -> Self {
        Self::Path {
            paths: vec![path.into()],
            args: None,
        }
    }

    pub fn paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Path {
            paths: paths.into_iter().map(Into::into).collect(),
            args: None,
        }
    }

    #[must_use]
    pub fn with_args(self, new_args: ProfileArgs) -> Self {
        match self {
            Self::Source { id, .. } => Self::Source {
                id,
                args: Some(new_args),
            },
            Self::Path { paths, .. } => Self::Path {
                paths,
                args: Some(new_args),
            },
        }
    }

    #[must_use]
    pub fn args(&self) -> Option<&ProfileArgs> {
        match self {
            Self::Source { args, .. } | Self::Path { args, .. } => args.as_ref(),
        }
    }
}

impl Serialize for CandidateProfile {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = match self {
            Self::Source { id, args } => RawProfile {
                source: Some(id.clone()),
                path: None,
                args: args.clone(),
            },
            Self::Path { paths, args } => RawProfile {
                source: None,
                path: Some(PathSpec::List(paths.clone())),
                args: args.clone(),
            },
        };
        raw.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum PathSpec {
    Single(String),
    List(Vec<String>),
}

/// On-disk shape: `{"path": ..., "args": ...}` or `{"source": ..., "args": ...}`.
#[derive(Serialize, Deserialize)]
struct RawProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<SourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<PathSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    args: Option<ProfileArgs>,
}

impl TryFrom<RawProfile> for CandidateProfile {
    type Error = &'static str;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        match (raw.source, raw.path) {
            (Some(id), _) => Ok(Self::Source { id, args: raw.args }),
            (None, Some(PathSpec::Single(path))) => Ok(Self::Path {
                paths: vec![path],
                args: raw.args,
            }),
            (None, Some(PathSpec::List(paths))) => Ok(Self::Path {
                paths,
                args: raw.args,
            }),
            (None, None) => Err("profile needs either a `path` or a `source`"),
        }
    }
}

/// Where a symbolic source may be installed, in order of preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotentialSource {
    pub profile_name: String,
    pub paths: Vec<String>,
    pub args: Option<Vec<String>>,
}

/// A profile whose executable was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedProfile {
    pub profile_name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<ProfileArgs>,
}
