// Copyright 2025 The LdapMatch Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// A `major.minor.micro.qualifier` version value.
///
/// The format is the OSGi one: up to three dot-separated non-negative
/// numeric components followed by an optional qualifier of word
/// characters and dashes. Missing numeric components default to zero and
/// a missing qualifier to the empty string, so `"1"`, `"1.0"`, `"1.0.0"`
/// and `"1.0.0."`-less forms denote the same version.
///
/// Ordering compares major, minor and micro numerically and the qualifier
/// lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    major: u32,
    minor: u32,
    micro: u32,
    qualifier: String,
}

/// Error raised when a version string does not conform to the
/// `major.minor.micro.qualifier` format.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version: {0}")]
pub struct VersionParseError(String);

impl Version {
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    pub fn with_qualifier(
        major: u32,
        minor: u32,
        micro: u32,
        qualifier: impl Into<String>,
    ) -> Result<Self, VersionParseError> {
        let qualifier = qualifier.into();
        if !qualifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(VersionParseError(qualifier));
        }
        Ok(Self {
            major,
            minor,
            micro,
            qualifier,
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn micro(&self) -> u32 {
        self.micro
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionParseError(s.to_string());

        if s.is_empty() {
            return Err(invalid());
        }
        let mut parts = s.split('.');
        let major = parts
            .next()
            .ok_or_else(invalid)?
            .parse::<u32>()
            .map_err(|_| invalid())?;
        let mut minor = 0;
        let mut micro = 0;
        let mut qualifier = String::new();
        if let Some(part) = parts.next() {
            minor = part.parse::<u32>().map_err(|_| invalid())?;
        }
        if let Some(part) = parts.next() {
            micro = part.parse::<u32>().map_err(|_| invalid())?;
        }
        if let Some(part) = parts.next() {
            qualifier = part.to_string();
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Version::with_qualifier(major, minor, micro, qualifier).map_err(|_| invalid())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_and_partial() {
        assert_eq!("1.2.3".parse::<Version>().unwrap(), Version::new(1, 2, 3));
        assert_eq!("1.2".parse::<Version>().unwrap(), Version::new(1, 2, 0));
        assert_eq!("1".parse::<Version>().unwrap(), Version::new(1, 0, 0));
        assert_eq!(
            "1.2.3.beta-1".parse::<Version>().unwrap(),
            Version::with_qualifier(1, 2, 3, "beta-1").unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("".parse::<Version>().is_err());
        assert!("a.b".parse::<Version>().is_err());
        assert!("1.-2".parse::<Version>().is_err());
        assert!("1.2.3.q.x".parse::<Version>().is_err());
        assert!("1.2.3.bad!qualifier".parse::<Version>().is_err());
    }

    #[test]
    fn test_ordering() {
        let v1: Version = "1.2.3".parse().unwrap();
        let v2: Version = "1.2.10".parse().unwrap();
        let v3: Version = "1.2.3.alpha".parse().unwrap();
        assert!(v1 < v2);
        assert!(v1 < v3);
        assert_eq!(v1, "1.2.3".parse::<Version>().unwrap());
    }

    #[test]
    fn test_display_round_trip() {
        let v: Version = "2.0.7.rc-2".parse().unwrap();
        assert_eq!(v.to_string(), "2.0.7.rc-2");
        assert_eq!(v.to_string().parse::<Version>().unwrap(), v);
        assert_eq!(Version::new(1, 0, 0).to_string(), "1.0.0");
    }
}
