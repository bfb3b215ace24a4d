// ABOUTME: Region code to region identifier lookup table.
// ABOUTME: Maps short codes found in resource identifiers (iad) to region ids (us-ashburn-1).

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("identifier does not carry a region code")]
    Blank,

    #[error("unknown region code: {0}")]
    UnknownCode(String),
}

/// (code, region id)
const REGIONS: &[(&str, &str)] = &[
    ("iad", "us-ashburn-1"),
    ("phx", "us-phoenix-1"),
    ("sjc", "us-sanjose-1"),
    ("ord", "us-chicago-1"),
    ("yyz", "ca-toronto-1"),
    ("yul", "ca-montreal-1"),
    ("qro", "mx-queretaro-1"),
    ("mty", "mx-monterrey-1"),
    ("gru", "sa-saopaulo-1"),
    ("vcp", "sa-vinhedo-1"),
    ("scl", "sa-santiago-1"),
    ("bog", "sa-bogota-1"),
    ("vap", "sa-valparaiso-1"),
    ("fra", "eu-frankfurt-1"),
    ("ams", "eu-amsterdam-1"),
    ("zrh", "eu-zurich-1"),
    ("cdg", "eu-paris-1"),
    ("mrs", "eu-marseille-1"),
    ("lin", "eu-milan-1"),
    ("arn", "eu-stockholm-1"),
    ("mad", "eu-madrid-1"),
    ("lhr", "uk-london-1"),
    ("cwl", "uk-cardiff-1"),
    ("mtz", "il-jerusalem-1"),
    ("jed", "me-jeddah-1"),
    ("dxb", "me-dubai-1"),
    ("auh", "me-abudhabi-1"),
    ("ruh", "me-riyadh-1"),
    ("jnb", "af-johannesburg-1"),
    ("nrt", "ap-tokyo-1"),
    ("kix", "ap-osaka-1"),
    ("icn", "ap-seoul-1"),
    ("yny", "ap-chuncheon-1"),
    ("bom", "ap-mumbai-1"),
    ("hyd", "ap-hyderabad-1"),
    ("sin", "ap-singapore-1"),
    ("xsp", "ap-singapore-2"),
    ("syd", "ap-sydney-1"),
    ("mel", "ap-melbourne-1"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    code: &'static str,
    id: &'static str,
}

impl Region {
    /// Look up a region by its short code. Matching ignores case.
    pub fn from_code(code: &str) -> Result<Self, RegionError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(RegionError::Blank);
        }

        REGIONS
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(|&(code, id)| Region { code, id })
            .ok_or_else(|| RegionError::UnknownCode(code.to_string()))
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn id(&self) -> &'static str {
        self.id
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let region = Region::from_code("IAD").unwrap();
        assert_eq!(region.code(), "iad");
        assert_eq!(region.id(), "us-ashburn-1");
        assert_eq!(region.to_string(), "us-ashburn-1");
    }

    #[test]
    fn blank_and_unknown_codes_fail() {
        assert_eq!(Region::from_code(""), Err(RegionError::Blank));
        assert_eq!(Region::from_code("  "), Err(RegionError::Blank));
        assert_eq!(
            Region::from_code("xyz"),
            Err(RegionError::UnknownCode("xyz".to_string()))
        );
    }
}
