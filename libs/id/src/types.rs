//! Typed identifiers for clusters and their node pools.
//!
//! Both types parse from and format to a canonical path representation,
//! and reject anything that is not exactly that representation.

use crate::IdError;

/// Maximum length of a node pool name.
const POOL_NAME_MAX_LEN: usize = 12;

/// Validates a node pool name against the pool naming rule:
/// `^[a-z][a-z0-9]{0,11}$`.
pub fn validate_pool_name(name: &str) -> Result<(), IdError> {
    let mut chars = name.chars();

    let valid = match chars.next() {
        Some(first) => {
            first.is_ascii_lowercase()
                && name.len() <= POOL_NAME_MAX_LEN
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(IdError::InvalidPoolName {
            name: name.to_string(),
        })
    }
}

/// Identifier of a managed cluster: a scope plus the cluster name.
///
/// Canonical form: `/scopes/{scope}/clusters/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId {
    scope: String,
    name: String,
}

impl ClusterId {
    /// Creates a cluster identifier from its parts.
    ///
    /// Both parts must be non-empty and free of `/`.
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Result<Self, IdError> {
        let scope = scope.into();
        let name = name.into();

        if scope.is_empty() || scope.contains('/') {
            return Err(IdError::InvalidValue {
                segment: "scopes",
                value: scope,
            });
        }
        if name.is_empty() || name.contains('/') {
            return Err(IdError::InvalidValue {
                segment: "clusters",
                value: name,
            });
        }

        Ok(Self { scope, name })
    }

    /// Returns the scope the cluster lives in.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Returns the cluster name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parses a cluster identifier from its canonical form.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let mut segments = Segments::of(s)?;
        let scope = segments.value("scopes")?;
        let name = segments.value("clusters")?;
        segments.end()?;

        Ok(Self { scope, name })
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/scopes/{}/clusters/{}", self.scope, self.name)
    }
}

impl std::str::FromStr for ClusterId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for ClusterId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for ClusterId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Identifier of a node pool, addressed through its parent cluster.
///
/// Canonical form: `/scopes/{scope}/clusters/{cluster}/pools/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePoolId {
    cluster: ClusterId,
    name: String,
}

impl NodePoolId {
    /// Creates a node pool identifier under the given cluster.
    ///
    /// The pool name must satisfy [`validate_pool_name`].
    pub fn new(cluster: ClusterId, name: impl Into<String>) -> Result<Self, IdError> {
        let name = name.into();
        validate_pool_name(&name)?;

        Ok(Self { cluster, name })
    }

    /// Returns the parent cluster identifier.
    pub fn cluster(&self) -> &ClusterId {
        &self.cluster
    }

    /// Returns the pool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parses a node pool identifier from its canonical form.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let mut segments = Segments::of(s)?;
        let scope = segments.value("scopes")?;
        let cluster_name = segments.value("clusters")?;
        let name = segments.value("pools")?;
        segments.end()?;

        validate_pool_name(&name)?;

        Ok(Self {
            cluster: ClusterId {
                scope,
                name: cluster_name,
            },
            name,
        })
    }
}

impl std::fmt::Display for NodePoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/pools/{}", self.cluster, self.name)
    }
}

impl std::str::FromStr for NodePoolId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for NodePoolId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for NodePoolId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Cursor over the `/`-separated segments of a rooted path.
struct Segments<'a> {
    iter: std::str::Split<'a, char>,
}

impl<'a> Segments<'a> {
    fn of(s: &'a str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        let Some(rest) = s.strip_prefix('/') else {
            return Err(IdError::NotRooted);
        };

        Ok(Self {
            iter: rest.split('/'),
        })
    }

    /// Consumes the fixed `keyword` segment and returns the value segment
    /// that follows it.
    fn value(&mut self, keyword: &'static str) -> Result<String, IdError> {
        match self.iter.next() {
            Some(seg) if seg == keyword => {}
            Some(seg) => {
                return Err(IdError::UnexpectedSegment {
                    expected: keyword,
                    actual: seg.to_string(),
                })
            }
            None => {
                return Err(IdError::UnexpectedSegment {
                    expected: keyword,
                    actual: String::new(),
                })
            }
        }

        match self.iter.next() {
            Some(seg) if !seg.is_empty() => Ok(seg.to_string()),
            _ => Err(IdError::MissingValue { segment: keyword }),
        }
    }

    /// Asserts that the path is fully consumed.
    fn end(&mut self) -> Result<(), IdError> {
        let rest: Vec<&str> = self.iter.by_ref().collect();
        if rest.is_empty() {
            Ok(())
        } else {
            Err(IdError::TrailingSegments {
                rest: rest.join("/"),
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
