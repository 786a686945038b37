//! Feedback log: star ratings left by users of the service.

pub mod handlers;

use serde::{Deserialize, Serialize};

use crate::store::{Field, Record, Schema, StoreError};

pub const NAME: &str = "Name";
pub const ROLE: &str = "Role";
pub const RATING: &str = "Rating";
pub const COMMENT: &str = "Comment";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

const ROLE_NAMES: &[&str] = &["Job Seeker", "Recruiter", "Other"];

pub fn feedback_schema() -> Schema {
    Schema::new(vec![
        Field::text(NAME),
        Field::choice(ROLE, ROLE_NAMES),
        Field::integer(RATING, MIN_RATING.into(), MAX_RATING.into()),
        Field::text(COMMENT),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackRole {
    #[serde(rename = "Job Seeker")]
    JobSeeker,
    Recruiter,
    Other,
}

impl FeedbackRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackRole::JobSeeker => "Job Seeker",
            FeedbackRole::Recruiter => "Recruiter",
            FeedbackRole::Other => "Other",
        }
    }

    fn parse(value: &str) -> Result<Self, StoreError> {
        match value {
            "Job Seeker" => Ok(FeedbackRole::JobSeeker),
            "Recruiter" => Ok(FeedbackRole::Recruiter),
            "Other" => Ok(FeedbackRole::Other),
            _ => Err(StoreError::InvalidValue {
                field: ROLE.to_string(),
                value: value.to_string(),
                reason: format!("expected one of: {}", ROLE_NAMES.join(", ")),
            }),
        }
    }
}

/// A feedback row in typed form. `name` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEntry {
    pub name: String,
    pub role: FeedbackRole,
    pub rating: u8,
    pub comment: String,
}

impl FeedbackEntry {
    pub fn to_record(&self) -> Record {
        Record::new()
            .with(NAME, self.name.as_str())
            .with(ROLE, self.role.as_str())
            .with(RATING, self.rating.to_string())
            .with(COMMENT, self.comment.as_str())
    }

    pub fn from_record(record: &Record) -> Result<Self, StoreError> {
        let field = |name: &str| {
            record
                .get(name)
                .ok_or_else(|| StoreError::UnknownField(name.to_string()))
        };

        let rating_text = field(RATING)?;
        let rating = rating_text
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
            .ok_or_else(|| StoreError::InvalidValue {
                field: RATING.to_string(),
                value: rating_text.to_string(),
                reason: format!("expected an integer in {MIN_RATING}..={MAX_RATING}"),
            })?;

        Ok(FeedbackEntry {
            name: field(NAME)?.to_string(),
            role: FeedbackRole::parse(field(ROLE)?)?,
            rating,
            comment: field(COMMENT)?.to_string(),
        })
    }
}

/// Mean rating, or `None` for an empty log.
pub fn average_rating(entries: &[FeedbackEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let total: u32 = entries.iter().map(|e| u32::from(e.rating)).sum();
    Some(f64::from(total) / entries.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rating: u8) -> FeedbackEntry {
        FeedbackEntry {
            name: String::new(),
            role: FeedbackRole::JobSeeker,
            rating,
            comment: "Helpful, fast".to_string(),
        }
    }

    #[test]
    fn test_record_conforms_to_feedback_schema() {
        let record = feedback_schema().conform(entry(4).to_record()).unwrap();
        assert_eq!(FeedbackEntry::from_record(&record).unwrap(), entry(4));
    }

    #[test]
    fn test_schema_rejects_out_of_range_rating() {
        for rating in [0, 6] {
            assert!(matches!(
                feedback_schema().conform(entry(rating).to_record()),
                Err(StoreError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn test_role_serde_names() {
        let json = serde_json::to_string(&FeedbackRole::JobSeeker).unwrap();
        assert_eq!(json, r#""Job Seeker""#);
        for role in [FeedbackRole::JobSeeker, FeedbackRole::Recruiter, FeedbackRole::Other] {
            assert_eq!(FeedbackRole::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[entry(5), entry(2)]), Some(3.5));
    }
}
