use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use shellscout_platform::Platform;

use crate::types::CandidateProfile;

/// A user override for one profile name. `null` in JSON removes the profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<CandidateProfile>")]
pub enum ProfileOverride {
    Remove,
    Set(CandidateProfile),
}

impl From<Option<CandidateProfile>> for ProfileOverride {
    fn from(value: Option<CandidateProfile>) -> Self {
        value.map_or(Self::Remove, Self::Set)
    }
}

impl Serialize for ProfileOverride {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Remove => serializer.serialize_none(),
            Self::Set(profile) => serializer.serialize_some(profile),
        }
    }
}

/// Overrides in the order they were written. A name given twice keeps its
/// first position and its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileOverrides(IndexMap<String, ProfileOverride>);

impl ProfileOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: ProfileOverride) {
        self.0.insert(name.into(), value);
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: ProfileOverride) -> Self {
        self.push(name, value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProfileOverride)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Per-platform profile overrides as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesConfig {
    #[serde(default)]
    pub windows: ProfileOverrides,

    #[serde(default)]
    pub linux: ProfileOverrides,

    #[serde(default)]
    pub osx: ProfileOverrides,

    /// Enumerate WSL distributions even in quick-launch mode.
    #[serde(default)]
    pub show_quick_launch_wsl_profiles: bool,
}

impl ProfilesConfig {
    #[must_use]
    pub fn overrides_for(&self, platform: Platform) -> &ProfileOverrides {
        match platform {
            Platform::Windows => &self.windows,
            Platform::Linux => &self.linux,
            Platform::MacOs => &self.osx,
        }
    }
}

/// Profiles keyed by display name, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileMap(IndexMap<String, CandidateProfile>);

impl ProfileMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites in place when `name` exists, appends otherwise.
    pub fn insert(&mut self, name: impl Into<String>, profile: CandidateProfile) {
        self.0.insert(name.into(), profile);
    }

    pub fn remove(&mut self, name: &str) -> Option<CandidateProfile> {
        self.0.shift_remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CandidateProfile> {
        self.0.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CandidateProfile)> {
        self.0.iter().map(|(name, profile)| (name.as_str(), profile))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, CandidateProfile)> for ProfileMap {
    fn from_iter<I: IntoIterator<Item = (S, CandidateProfile)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, profile) in iter {
            map.insert(name, profile);
        }
        map
    }
}

/// Layer user overrides on top of the built-in profiles.
#[must_use]
pub fn apply_overrides(mut builtins: ProfileMap, overrides: &ProfileOverrides) -> ProfileMap {
    for (name, value) in overrides.iter() {
        match value {
            ProfileOverride::Remove => {
                if builtins.remove(name).is_some() {
                    log::trace!("Profile \"{name}\" removed by configuration");
                }
            }
            ProfileOverride::Set(profile) => builtins.insert(name, profile.clone()),
        }
    }
    builtins
}
