use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LookupError, Result};

/// Key under which a schema is registered, normalized to `/a/b` form.
///
/// A leading slash is added, repeated slashes collapse and a trailing slash
/// is dropped, so `users//42/` and `/users/42` name the same endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointId(String);

impl EndpointId {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LookupError::InvalidEndpoint(raw.to_string()));
        }
        Self::from_segments(trimmed.split('/'))
    }

    /// Join wildcard path segments captured by a router.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = String::new();
        for segment in segments {
            for part in segment.as_ref().split('/').map(str::trim) {
                if part.is_empty() {
                    continue;
                }
                normalized.push('/');
                normalized.push_str(part);
            }
        }

        if normalized.is_empty() {
            normalized.push('/');
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EndpointId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for EndpointId {
    type Err = LookupError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::parse(raw)
    }
}

impl TryFrom<String> for EndpointId {
    type Error = LookupError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<EndpointId> for String {
    fn from(endpoint: EndpointId) -> Self {
        endpoint.0
    }
}
