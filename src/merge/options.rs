//! Merge configuration

use std::fmt;
use std::str::FromStr;

use crate::base::Limits;
use crate::syntax::FormatOptions;

/// What happens when a later document declares a vertex that an earlier
/// document already declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CollisionPolicy {
    /// The later definition replaces kind and parameters; a warning is emitted.
    #[default]
    LaterWins,
    /// Parameters merge key by key, later values win; a warning is emitted.
    DeepMerge,
    /// Every collision is an error.
    Reject,
}

impl CollisionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CollisionPolicy::LaterWins => "later-wins",
            CollisionPolicy::DeepMerge => "deep-merge",
            CollisionPolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "later-wins" => Ok(CollisionPolicy::LaterWins),
            "deep-merge" => Ok(CollisionPolicy::DeepMerge),
            "reject" => Ok(CollisionPolicy::Reject),
            other => Err(format!(
                "unknown collision policy '{}' (expected later-wins, deep-merge or reject)",
                other
            )),
        }
    }
}

/// Options for [`super::Merger`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub collision: CollisionPolicy,
    pub limits: Limits,
    /// Layout of the merged document text
    pub format: FormatOptions,
}

impl MergeOptions {
    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }
}
