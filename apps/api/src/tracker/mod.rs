//! Application tracker: one row per submitted job application.

pub mod handlers;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::{Field, Record, Schema, StoreError};

pub const COMPANY: &str = "Company";
pub const TITLE: &str = "Title";
pub const STATUS: &str = "Status";
pub const RESUME_VERSION: &str = "ResumeVersion";
pub const SUMMARY_FILE: &str = "SummaryFile";
pub const EMAIL_FILE: &str = "EmailFile";

const STATUS_NAMES: &[&str] = &["Applied", "Interviewing", "Offer", "Rejected"];

pub fn tracker_schema() -> Schema {
    Schema::new(vec![
        Field::text(COMPANY),
        Field::text(TITLE),
        Field::choice(STATUS, STATUS_NAMES),
        Field::text(RESUME_VERSION),
        Field::text(SUMMARY_FILE),
        Field::text(EMAIL_FILE),
    ])
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StoreError::InvalidValue {
                field: STATUS.to_string(),
                value: s.to_string(),
                reason: format!("expected one of: {}", STATUS_NAMES.join(", ")),
            })
    }
}

/// A tracker row in typed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub company: String,
    pub title: String,
    pub status: ApplicationStatus,
    pub resume_version: String,
    pub summary_file: String,
    pub email_file: String,
}

impl Application {
    pub fn to_record(&self) -> Record {
        Record::new()
            .with(COMPANY, self.company.as_str())
            .with(TITLE, self.title.as_str())
            .with(STATUS, self.status.as_str())
            .with(RESUME_VERSION, self.resume_version.as_str())
            .with(SUMMARY_FILE, self.summary_file.as_str())
            .with(EMAIL_FILE, self.email_file.as_str())
    }

    pub fn from_record(record: &Record) -> Result<Self, StoreError> {
        let field = |name: &str| {
            record
                .get(name)
                .map(str::to_string)
                .ok_or_else(|| StoreError::UnknownField(name.to_string()))
        };

        Ok(Application {
            company: field(COMPANY)?,
            title: field(TITLE)?,
            status: field(STATUS)?.parse()?,
            resume_version: field(RESUME_VERSION)?,
            summary_file: field(SUMMARY_FILE)?,
            email_file: field(EMAIL_FILE)?,
        })
    }
}
