//! Résumé upload -> plain text -> ATS signals.
//!
//! The résumé has no extraction adapter. Its raw record is built locally and
//! handed to the aggregator as a provided record.

pub mod ats;

use tracing::debug;

use crate::extraction::error::ValidationError;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const MIN_TEXT_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResumeFormat {
    Pdf,
    PlainText,
}

impl ResumeFormat {
    fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "txt" | "md" | "markdown" => Some(ResumeFormat::PlainText),
            _ => None,
        }
    }
}

/// Extracts the text of an uploaded résumé (PDF, plain text or markdown).
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ValidationError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::Input(format!(
            "Résumé file exceeds {} MiB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    let format = ResumeFormat::from_file_name(file_name).ok_or_else(|| {
        ValidationError::Input(format!(
            "Unsupported résumé file type '{file_name}'; upload a PDF, TXT or MD file"
        ))
    })?;

    let text = match format {
        ResumeFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ValidationError::Input(format!("Could not read PDF: {e}")))?,
        ResumeFormat::PlainText => String::from_utf8(bytes.to_vec())
            .map_err(|_| ValidationError::Input("Résumé text is not valid UTF-8".to_string()))?,
    };

    let text = text.trim().to_string();
    if text.chars().count() < MIN_TEXT_CHARS {
        return Err(ValidationError::Input(format!(
            "Résumé must contain at least {MIN_TEXT_CHARS} characters of text"
        )));
    }

    debug!("Extracted {} characters from résumé '{file_name}'", text.len());
    Ok(text)
}
