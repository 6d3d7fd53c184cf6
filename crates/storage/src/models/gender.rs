use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Gender recorded on an athlete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// The category code an athlete of this gender matches exactly.
    pub fn category_code(&self) -> CategoryGender {
        match self {
            Self::Male => CategoryGender::M,
            Self::Female => CategoryGender::F,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown gender: '{0}'")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" | "MEN" => Ok(Self::Male),
            "F" | "FEMALE" | "WOMEN" => Ok(Self::Female),
            _ => Err(UnknownGender(s.to_string())),
        }
    }
}

/// Gender scope of an age category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CategoryGender {
    M,
    F,
    #[serde(rename = "MIXED")]
    Mixed,
}

impl CategoryGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M => "M",
            Self::F => "F",
            Self::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for CategoryGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryGender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" => Ok(Self::M),
            "F" => Ok(Self::F),
            "MIXED" | "MX" => Ok(Self::Mixed),
            _ => Err(UnknownGender(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parsing_is_lenient() {
        assert_eq!("male".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!(" F ".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("Women".parse::<Gender>(), Ok(Gender::Female));
        assert!("x".parse::<Gender>().is_err());
    }

    #[test]
    fn test_category_gender_serializes_as_code() {
        let json = serde_json::to_string(&CategoryGender::Mixed).unwrap();
        assert_eq!(json, "\"MIXED\"");
        let parsed: CategoryGender = serde_json::from_str("\"F\"").unwrap();
        assert_eq!(parsed, CategoryGender::F);
    }

    #[test]
    fn test_gender_maps_to_category_code() {
        assert_eq!(Gender::Male.category_code(), CategoryGender::M);
        assert_eq!(Gender::Female.category_code(), CategoryGender::F);
    }
}
