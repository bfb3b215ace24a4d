// ABOUTME: Cloud resource identifier (OCID) parsing and validation.
// ABOUTME: Handles formats like ocid1.<type>.<realm>.[region].<unique-id>.

use std::fmt;
use thiserror::Error;

const MAX_LENGTH: usize = 255;
const MIN_PARTS: usize = 5;
const ENTITY_TYPE_MAX_LENGTH: usize = 32;
const REALM_MAX_LENGTH: usize = 15;
const REGION_MAX_LENGTH: usize = 24;
const VERSIONS: [&str; 2] = ["ocidv1", "ocid1"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OcidError {
    #[error("OCID is too long ({0} characters, maximum is 255)")]
    TooLong(usize),

    #[error("OCID has too few parts ({0}, expected at least 5)")]
    TooFewParts(usize),

    #[error("OCID has missing version")]
    MissingVersion,

    #[error("OCID has invalid version: {0}")]
    InvalidVersion(String),

    #[error("OCID has missing entity type")]
    MissingEntityType,

    #[error("OCID has invalid entity type: {0}")]
    InvalidEntityType(String),

    #[error("OCID has missing realm")]
    MissingRealm,

    #[error("OCID has invalid realm: {0}")]
    InvalidRealm(String),

    #[error("OCID has invalid region: {0}")]
    InvalidRegion(String),

    #[error("OCID has invalid part {index}: {value}")]
    InvalidPart { index: usize, value: String },
}

/// A validated resource identifier.
///
/// The input text is kept as-is; the segments are exposed through
/// accessors. The region segment may be empty for global resources such as
/// tenancies and users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ocid {
    raw: String,
    version: String,
    entity_type: String,
    realm: String,
    region: String,
    remainder: Vec<String>,
}

impl Ocid {
    pub fn parse(input: &str) -> Result<Self, OcidError> {
        let length = input.chars().count();
        if length > MAX_LENGTH {
            return Err(OcidError::TooLong(length));
        }

        let mut parts: Vec<&str> = input.split(['.', ':']).collect();
        // Trailing empty segments do not count as parts
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }
        if parts.len() < MIN_PARTS {
            return Err(OcidError::TooFewParts(parts.len()));
        }

        let version = parts[0];
        if is_blank(version) {
            return Err(OcidError::MissingVersion);
        }
        if !VERSIONS.contains(&version.to_lowercase().as_str()) {
            return Err(OcidError::InvalidVersion(version.to_string()));
        }

        let entity_type = parts[1];
        if is_blank(entity_type) {
            return Err(OcidError::MissingEntityType);
        }
        if !is_common_part(entity_type, ENTITY_TYPE_MAX_LENGTH) {
            return Err(OcidError::InvalidEntityType(entity_type.to_string()));
        }

        let realm = parts[2];
        if is_blank(realm) {
            return Err(OcidError::MissingRealm);
        }
        if !is_common_part(realm, REALM_MAX_LENGTH) {
            return Err(OcidError::InvalidRealm(realm.to_string()));
        }

        let region = parts[3];
        if !is_blank(region) && !is_common_part(region, REGION_MAX_LENGTH) {
            return Err(OcidError::InvalidRegion(region.to_string()));
        }

        for (index, part) in parts.iter().enumerate().skip(4) {
            if !is_other_part(part) {
                return Err(OcidError::InvalidPart {
                    index,
                    value: (*part).to_string(),
                });
            }
        }

        Ok(Self {
            raw: input.to_string(),
            version: version.to_string(),
            entity_type: entity_type.to_string(),
            realm: realm.to_string(),
            region: region.to_string(),
            remainder: parts[4..].iter().map(|p| (*p).to_string()).collect(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Region code segment, empty when the identifier carries no region.
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn remainder(&self) -> &[String] {
        &self.remainder
    }
}

impl fmt::Display for Ocid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Extract the region code from a resource identifier.
///
/// Returns the region segment exactly as written, or an empty string when the
/// identifier has a blank region segment.
pub fn parse_region(input: &str) -> Result<String, OcidError> {
    Ocid::parse(input).map(|ocid| ocid.region)
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// `^[a-z][a-z0-9-_]*[a-z0-9]+$` checked case-insensitively, plus a length cap.
fn is_common_part(part: &str, max_length: usize) -> bool {
    if part.chars().count() > max_length {
        return false;
    }

    let lower = part.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return false;
    };

    bytes.len() >= 2
        && first.is_ascii_lowercase()
        && (last.is_ascii_lowercase() || last.is_ascii_digit())
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-' || *b == b'_')
}

/// `^[a-zA-Z0-9-_]*$`
fn is_other_part(part: &str) -> bool {
    part.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
