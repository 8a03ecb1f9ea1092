//! Rulebook PDF extraction.
//!
//! Thin wrapper over `pdf_extract`; the extracted text is opaque input to the
//! prompt builder. Extraction runs on the UI thread at load time (it is local
//! file work, not a network call).

use crate::error::{OracleError, OracleResult};
use std::path::Path;
use tracing::info;

/// Extract plain text from a rulebook PDF at `path`.
pub fn extract_rulebook(path: &Path) -> OracleResult<String> {
    if !path.exists() {
        return Err(OracleError::Pdf(format!("{} not found", path.display())));
    }
    let text = pdf_extract::extract_text(path)
        .map_err(|e| OracleError::Pdf(format!("{}: {e}", path.display())))?;
    if text.trim().is_empty() {
        return Err(OracleError::Pdf(format!(
            "{}: no readable text found in the tome",
            path.display()
        )));
    }
    info!(target: "pdf", chars = text.len(), path = %path.display(), "rulebook_extracted");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_pdf_error() {
        let err = extract_rulebook(Path::new("/no/such/tome.pdf")).unwrap_err();
        assert!(matches!(err, OracleError::Pdf(_)));
    }

    #[test]
    fn non_pdf_bytes_are_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();
        assert!(matches!(extract_rulebook(&path), Err(OracleError::Pdf(_))));
    }
}
