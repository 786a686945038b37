//! Files produced per submission: the stored résumé, a JD copy, the summary and the email.
//!
//! Generated names derive from company and title only, so resubmitting the same pair
//! overwrites the previous files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// File names generated for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    pub jd: String,
    pub summary: String,
    pub email: String,
}

impl ArtifactNames {
    pub fn for_application(company_name: &str, job_title: &str) -> Self {
        let prefix = file_prefix(company_name, job_title);
        Self {
            jd: format!("{prefix}_jd.txt"),
            summary: format!("{prefix}_summary.txt"),
            email: format!("{prefix}_email.txt"),
        }
    }
}

/// `"<company>_<title>"` with spaces turned into underscores. Path separators are
/// replaced as well so the name always stays inside the outputs directory.
pub fn file_prefix(company_name: &str, job_title: &str) -> String {
    format!("{company_name}_{job_title}").replace([' ', '/', '\\'], "_")
}

/// Reduces a client-supplied upload name to its final path component.
/// Returns `None` when nothing usable is left.
pub fn upload_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// True if `name` is a bare file name with no directory parts.
pub fn is_bare_file_name(name: &str) -> bool {
    upload_file_name(name).as_deref() == Some(name)
}

/// Case-insensitive extension check.
pub fn has_extension(name: &str, allowed: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Writes `contents` to `dir/name`, replacing any existing file.
pub async fn write_artifact(dir: &Path, name: &str, contents: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let path = dir.join(name);
    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_prefix_replaces_spaces() {
        assert_eq!(file_prefix("Acme Corp", "Product Manager"), "Acme_Corp_Product_Manager");
    }

    #[test]
    fn test_file_prefix_cannot_escape_directory() {
        assert_eq!(file_prefix("../evil", "a/b"), ".._evil_a_b");
    }

    #[test]
    fn test_artifact_names_are_deterministic() {
        let a = ArtifactNames::for_application("Acme", "PM");
        assert_eq!(a, ArtifactNames::for_application("Acme", "PM"));
        assert_eq!(a.jd, "Acme_PM_jd.txt");
        assert_eq!(a.summary, "Acme_PM_summary.txt");
        assert_eq!(a.email, "Acme_PM_email.txt");
    }

    #[test]
    fn test_upload_file_name_strips_directories() {
        assert_eq!(upload_file_name("resume.pdf").as_deref(), Some("resume.pdf"));
        assert_eq!(upload_file_name("/etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(
            upload_file_name(r"C:\Users\me\cv.docx").as_deref(),
            Some("cv.docx")
        );
        assert_eq!(upload_file_name("dir/"), None);
        assert_eq!(upload_file_name(".."), None);
    }

    #[test]
    fn test_is_bare_file_name() {
        assert!(is_bare_file_name("Acme_PM_summary.txt"));
        assert!(!is_bare_file_name("../application_tracker.csv"));
        assert!(!is_bare_file_name("a/b.txt"));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("jd.TXT", &["txt"]));
        assert!(has_extension("cv.docx", &["pdf", "docx", "txt"]));
        assert!(!has_extension("cv.exe", &["pdf", "docx", "txt"]));
        assert!(!has_extension("noext", &["txt"]));
    }

    #[tokio::test]
    async fn test_write_artifact_overwrites() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("outputs");
        write_artifact(&out, "a.txt", b"first").await.unwrap();
        let path = write_artifact(&out, "a.txt", b"second").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"second");
    }
}
