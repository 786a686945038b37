//! Draft text for a submitted application: a JD summary and a recruiter email.
//!
//! Drafting sits behind the `DraftWriter` trait so a real generator can replace the
//! template writer without touching the handlers.

pub mod artifacts;
pub mod templates;

use crate::drafting::templates::{EMAIL_TEMPLATE, SUMMARY_TEMPLATE};

pub trait DraftWriter: Send + Sync {
    /// Summarizes a job description.
    fn summarize(&self, jd_text: &str) -> String;

    /// Drafts an email to the recruiter for the given role.
    fn draft_email(&self, company_name: &str, job_title: &str) -> String;
}

/// Returns fixed template text. The job description is not inspected.
pub struct TemplateDraftWriter {
    sender_name: String,
}

impl TemplateDraftWriter {
    pub fn new(sender_name: impl Into<String>) -> Self {
        Self {
            sender_name: sender_name.into(),
        }
    }
}

impl DraftWriter for TemplateDraftWriter {
    fn summarize(&self, _jd_text: &str) -> String {
        SUMMARY_TEMPLATE.to_string()
    }

    fn draft_email(&self, company_name: &str, job_title: &str) -> String {
        EMAIL_TEMPLATE
            .replace("{job_title}", job_title)
            .replace("{company_name}", company_name)
            .replace("{sender_name}", &self.sender_name)
    }
}
