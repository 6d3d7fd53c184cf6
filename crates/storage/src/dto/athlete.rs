use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::nullable;
use crate::models::{Athlete, Gender};
use crate::services::{bucket_weight_class, classification::birth_year};

/// Response containing athlete information plus the standard weight
/// division their current weight falls into.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AthleteResponse {
    pub athlete_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<String>,
    pub gender: Gender,
    pub weight: Decimal,
    pub weight_division: String,
    pub rank: Option<String>,
    pub club_id: Option<Uuid>,
    pub nationality: Option<String>,
    pub license_number: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Request payload for creating a new athlete
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAthleteRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "First name must be between 1 and 255 characters"
    ))]
    pub first_name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Last name must be between 1 and 255 characters"
    ))]
    pub last_name: String,

    #[validate(custom(function = "validate_birth_date"))]
    pub birth_date: Option<String>,

    pub gender: Gender,

    #[validate(custom(function = "validate_weight"))]
    #[serde(default)]
    pub weight: Decimal,

    #[validate(length(max = 50))]
    pub rank: Option<String>,

    pub club_id: Option<Uuid>,

    #[validate(length(max = 255))]
    pub nationality: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub license_number: Option<String>,
}

/// Request payload for updating an existing athlete
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAthleteRequest {
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,

    #[validate(custom(function = "validate_birth_date"))]
    pub birth_date: Option<String>,

    pub gender: Option<Gender>,

    #[validate(custom(function = "validate_weight"))]
    pub weight: Option<Decimal>,

    /// `null` clears the rank.
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    #[validate(length(max = 50))]
    pub rank: Option<Option<String>>,

    /// `null` removes the athlete from their club.
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub club_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    #[validate(length(max = 255))]
    pub nationality: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    #[validate(length(min = 1, max = 64))]
    pub license_number: Option<Option<String>>,
}

fn validate_birth_date(birth_date: &str) -> Result<(), validator::ValidationError> {
    match birth_year(birth_date) {
        Some(_) => Ok(()),
        None => Err(validator::ValidationError::new("invalid_birth_date")
            .with_message("Birth date must start with a four-digit year".into())),
    }
}

// 0 means "not weighed"
fn validate_weight(weight: &Decimal) -> Result<(), validator::ValidationError> {
    if weight.is_sign_negative() || *weight > Decimal::from(400) {
        Err(validator::ValidationError::new("invalid_weight")
            .with_message("Weight must be between 0 and 400 kg".into()))
    } else {
        Ok(())
    }
}

impl From<Athlete> for AthleteResponse {
    fn from(athlete: Athlete) -> Self {
        let weight_division = bucket_weight_class(athlete.gender, athlete.weight).to_string();
        Self {
            athlete_id: athlete.athlete_id,
            first_name: athlete.first_name,
            last_name: athlete.last_name,
            birth_date: athlete.birth_date,
            gender: athlete.gender,
            weight: athlete.weight,
            weight_division,
            rank: athlete.rank,
            club_id: athlete.club_id,
            nationality: athlete.nationality,
            license_number: athlete.license_number,
            created_at: athlete.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> CreateAthleteRequest {
        CreateAthleteRequest {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            birth_date: Some("2001-04-12".to_string()),
            gender: Gender::Female,
            weight: dec!(57),
            rank: Some("1st dan".to_string()),
            club_id: None,
            nationality: None,
            license_number: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_rejects_unreadable_birth_date() {
        let mut req = request();
        req.birth_date = Some("12/04/2001".to_string());
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("birth_date"));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut req = request();
        req.weight = dec!(-1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_weight_is_allowed() {
        let mut req = request();
        req.weight = Decimal::ZERO;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_validates_present_fields_only() {
        let update = UpdateAthleteRequest {
            weight: Some(dec!(500)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(UpdateAthleteRequest::default().validate().is_ok());
    }

    #[test]
    fn test_update_tells_null_from_missing() {
        let update: UpdateAthleteRequest =
            serde_json::from_str(r#"{"rank": null, "nationality": "FRA"}"#).unwrap();
        assert_eq!(update.rank, Some(None));
        assert_eq!(update.nationality, Some(Some("FRA".to_string())));
        assert_eq!(update.club_id, None);
        assert_eq!(update.license_number, None);

        let empty_license = UpdateAthleteRequest {
            license_number: Some(Some(String::new())),
            ..Default::default()
        };
        assert!(empty_license.validate().is_err());
    }
}
