//! Local document extraction and document-store records.
//!
//! Mirrors what the blob-triggered processor writes to the document store:
//! one record per processed blob, camelCase fields, id derived from the
//! filename and the processing timestamp.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Document store database name.
pub const STORE_DATABASE: &str = "InformationExtractionDB";

/// Document store container name.
pub const STORE_CONTAINER: &str = "ProcessedDocuments";

/// Partition key path of the document store container.
pub const PARTITION_KEY: &str = "/id";

/// Tag recorded in metadata for this extraction strategy.
pub const PROCESSING_METHOD: &str = "basic_text_extraction";

/// Stored text is capped at this many characters.
const TEXT_LIMIT: usize = 10_000;

/// Extraction metadata stored alongside the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Lowercased file extension, or "unknown"
    pub file_extension: String,
    /// Size of the raw content in bytes
    pub file_size_bytes: u64,
    /// Whitespace-separated word count of the extracted text
    pub word_count: usize,
    /// Character count of the extracted text
    pub character_count: usize,
    /// Extraction strategy tag
    pub processing_method: String,
}

/// Result of extracting a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Processing timestamp, ISO-8601 with microseconds
    pub timestamp: String,
    /// Extracted text, capped at the storage limit
    pub text: String,
    /// Extraction metadata
    pub metadata: DocumentMetadata,
}

/// Processing outcome recorded on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// Extraction finished and the text fields are populated.
    Completed,
    /// Extraction failed and the error field is populated.
    Error,
}

/// A document-store record, in the exact wire shape the store expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Unique id: filename + processing timestamp, store-safe
    pub id: String,
    /// Name of the uploaded file
    pub original_file_name: String,
    /// Size of the uploaded blob in bytes
    pub blob_size: u64,
    /// When processing happened, ISO-8601
    pub processed_timestamp: String,
    /// Extracted text (success records only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    /// Extraction metadata (success records only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocumentMetadata>,
    /// Failure detail (error records only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Processing outcome
    pub processing_status: ProcessingStatus,
}

impl DocumentRecord {
    /// Build the record for a successfully processed document.
    pub fn completed(filename: &str, content: &[u8], now: DateTime<Utc>) -> Self {
        let extraction = extract(content, filename, now);
        Self {
            id: record_id(filename, &extraction.timestamp),
            original_file_name: filename.to_string(),
            blob_size: content.len() as u64,
            processed_timestamp: extraction.timestamp.clone(),
            extracted_text: Some(extraction.text),
            metadata: Some(extraction.metadata),
            error: None,
            processing_status: ProcessingStatus::Completed,
        }
    }

    /// Build the record for a document that failed processing.
    pub fn failed(
        filename: &str,
        blob_size: u64,
        error: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let timestamp = format_timestamp(now);
        Self {
            id: format!("{}_error_{}", filename, store_safe(&timestamp)),
            original_file_name: filename.to_string(),
            blob_size,
            processed_timestamp: timestamp,
            extracted_text: None,
            metadata: None,
            error: Some(error.into()),
            processing_status: ProcessingStatus::Error,
        }
    }
}

/// Extract text and metadata from raw document content.
///
/// Text files (`.txt`, `.csv`, `.json`) are decoded as UTF-8; anything else
/// (including text files with invalid UTF-8) gets a placeholder instead.
/// Word and character counts cover the full text, while the stored text is
/// capped at the storage limit.
pub fn extract(content: &[u8], filename: &str, now: DateTime<Utc>) -> Extraction {
    let text = if has_text_extension(filename) {
        match std::str::from_utf8(content) {
            Ok(s) => s.to_string(),
            Err(_) => format!("Binary file that couldn't be decoded as text: {}", filename),
        }
    } else {
        format!("Binary file: {}", filename)
    };

    let word_count = text.split_whitespace().count();
    let character_count = text.chars().count();

    Extraction {
        timestamp: format_timestamp(now),
        text: truncate_chars(&text, TEXT_LIMIT),
        metadata: DocumentMetadata {
            file_extension: file_extension(filename),
            file_size_bytes: content.len() as u64,
            word_count,
            character_count,
            processing_method: PROCESSING_METHOD.to_string(),
        },
    }
}

/// Build a store-safe record id from a filename and a timestamp.
pub fn record_id(filename: &str, timestamp: &str) -> String {
    format!("{}_{}", filename, store_safe(timestamp))
}

/// Detect the MIME type of a file by extension.
pub fn mime_for(filename: &str) -> &'static str {
    match file_extension(filename).as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "html" | "htm" => "text/html",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// ISO-8601 with microseconds and no offset suffix, the store's timestamp
/// convention.
fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Replace the characters the store rejects in ids.
fn store_safe(timestamp: &str) -> String {
    timestamp.replace([':', '.'], "-")
}

fn has_text_extension(filename: &str) -> bool {
    matches!(file_extension(filename).as_str(), "txt" | "csv" | "json")
}

/// Lowercased last extension segment, or "unknown" for extensionless names.
fn file_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Truncate to at most `limit` characters, on a char boundary.
fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, 10, 30, 0).unwrap()
            + chrono::Duration::microseconds(123_456)
    }

    #[test]
    fn test_extract_text_file() {
        let extraction = extract(b"hello document world", "notes.txt", fixed_now());
        assert_eq!(extraction.text, "hello document world");
        assert_eq!(extraction.metadata.file_extension, "txt");
        assert_eq!(extraction.metadata.file_size_bytes, 20);
        assert_eq!(extraction.metadata.word_count, 3);
        assert_eq!(extraction.metadata.character_count, 20);
        assert_eq!(extraction.metadata.processing_method, "basic_text_extraction");
    }

    #[test]
    fn test_extract_binary_file() {
        let extraction = extract(&[0xff, 0xfe, 0x00], "scan.pdf", fixed_now());
        assert_eq!(extraction.text, "Binary file: scan.pdf");
        assert_eq!(extraction.metadata.file_extension, "pdf");
    }

    #[test]
    fn test_extract_invalid_utf8_in_text_file() {
        let extraction = extract(&[0xff, 0xfe], "broken.txt", fixed_now());
        assert_eq!(
            extraction.text,
            "Binary file that couldn't be decoded as text: broken.txt"
        );
    }

    #[test]
    fn test_extract_no_extension() {
        let extraction = extract(b"data", "README", fixed_now());
        assert_eq!(extraction.metadata.file_extension, "unknown");
        assert_eq!(extraction.text, "Binary file: README");
    }

    #[test]
    fn test_counts_cover_full_text_but_stored_text_is_capped() {
        let content = "a ".repeat(6_000);
        let extraction = extract(content.as_bytes(), "big.txt", fixed_now());
        assert_eq!(extraction.metadata.word_count, 6_000);
        assert_eq!(extraction.metadata.character_count, 12_000);
        assert_eq!(extraction.text.chars().count(), 10_000);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let content = "é".repeat(10_050);
        let extraction = extract(content.as_bytes(), "accents.txt", fixed_now());
        assert_eq!(extraction.text.chars().count(), 10_000);
        assert_eq!(extraction.metadata.character_count, 10_050);
    }

    #[test]
    fn test_record_id_is_store_safe() {
        let id = record_id("report.pdf", "2025-03-04T10:30:00.123456");
        assert_eq!(id, "report.pdf_2025-03-04T10-30-00-123456");
        // Only the timestamp part is rewritten, the filename keeps its dot
        let (_, ts_part) = id.rsplit_once('_').unwrap();
        assert!(!ts_part.contains(':'));
        assert!(!ts_part.contains('.'));
    }

    #[test]
    fn test_completed_record_wire_shape() {
        let record = DocumentRecord::completed("notes.txt", b"some words here", fixed_now());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["id"], "notes.txt_2025-03-04T10-30-00-123456");
        assert_eq!(value["originalFileName"], "notes.txt");
        assert_eq!(value["blobSize"], 15);
        assert_eq!(value["processedTimestamp"], "2025-03-04T10:30:00.123456");
        assert_eq!(value["extractedText"], "some words here");
        assert_eq!(value["metadata"]["wordCount"], 3);
        assert_eq!(value["processingStatus"], "completed");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failed_record_wire_shape() {
        let record = DocumentRecord::failed("broken.bin", 42, "decode exploded", fixed_now());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["id"], "broken.bin_error_2025-03-04T10-30-00-123456");
        assert_eq!(value["blobSize"], 42);
        assert_eq!(value["error"], "decode exploded");
        assert_eq!(value["processingStatus"], "error");
        assert!(value.get("extractedText").is_none());
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("scan.pdf"), "application/pdf");
        assert_eq!(mime_for("deck.PPTX"), "application/vnd.openxmlformats-officedocument.presentationml.presentation");
        assert_eq!(mime_for("photo.JPG"), "image/jpeg");
        assert_eq!(mime_for("mystery.bin"), "application/octet-stream");
        assert_eq!(mime_for("noext"), "application/octet-stream");
    }
}
