//! Receipt documents attached to transactions, and the client-side size
//! gate applied before upload.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::Error;

use super::transaction::TransactionId;

/// Database identifier for a document.
pub type DocumentId = i64;

/// The largest file that may be uploaded as a document: 3 MiB, inclusive.
///
/// A file of exactly this size is accepted; one byte more is rejected
/// before any network call is made. The server enforces its own limit
/// independently.
pub const MAX_DOCUMENT_BYTES: usize = 3 * 1024 * 1024;

/// Document metadata as embedded in transaction listings.
///
/// The file content itself is fetched separately via the document data
/// endpoint to keep transaction lists small.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// The document's ID in the backend database.
    pub id: DocumentId,
    /// The original name of the uploaded file.
    pub filename: String,
    /// The MIME type of the file, e.g. "image/png".
    pub file_type: String,
    /// The size of the decoded file in bytes.
    pub file_size: u64,
}

/// A document with its file content, as returned by the data endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The document's ID in the backend database.
    pub id: DocumentId,
    /// The original name of the uploaded file.
    pub filename: String,
    /// The MIME type of the file.
    pub file_type: String,
    /// The size of the decoded file in bytes.
    pub file_size: u64,
    /// The file content as a base64 data URI.
    pub file_data: String,
    /// The transaction the document is attached to.
    pub transaction_id: TransactionId,
}

/// The request body for uploading a document, with the file content
/// embedded as a base64 data URI.
///
/// Construct with [DocumentUpload::new], which enforces the
/// [MAX_DOCUMENT_BYTES] gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentUpload {
    /// The original name of the file.
    pub filename: String,
    /// The MIME type of the file.
    pub file_type: String,
    /// The file content as a `data:<mime>;base64,<content>` string.
    pub file_data: String,
}

impl DocumentUpload {
    /// Encode a file for upload.
    ///
    /// # Errors
    ///
    /// Returns [Error::FileTooLarge] if `bytes` is larger than
    /// [MAX_DOCUMENT_BYTES]. The boundary is inclusive: exactly 3 MiB
    /// passes.
    pub fn new(filename: &str, file_type: &str, bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(Error::FileTooLarge { size: bytes.len() });
        }

        Ok(Self {
            filename: filename.to_owned(),
            file_type: file_type.to_owned(),
            file_data: format!("data:{};base64,{}", file_type, STANDARD.encode(bytes)),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{DocumentUpload, MAX_DOCUMENT_BYTES};

    #[test]
    fn accepts_file_of_exactly_three_mebibytes() {
        let bytes = vec![0u8; MAX_DOCUMENT_BYTES];

        let upload = DocumentUpload::new("receipt.png", "image/png", &bytes);

        assert!(upload.is_ok());
    }

    #[test]
    fn rejects_file_one_byte_over_the_limit() {
        let bytes = vec![0u8; MAX_DOCUMENT_BYTES + 1];

        let upload = DocumentUpload::new("receipt.png", "image/png", &bytes);

        match upload {
            Err(Error::FileTooLarge { size }) => assert_eq!(size, MAX_DOCUMENT_BYTES + 1),
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn rejection_message_matches_the_ui_copy() {
        let bytes = vec![0u8; MAX_DOCUMENT_BYTES + 1];

        let error = DocumentUpload::new("receipt.png", "image/png", &bytes).unwrap_err();

        assert_eq!(error.to_string(), "File too large");
    }

    #[test]
    fn encodes_content_as_data_uri() {
        let upload = DocumentUpload::new("note.txt", "text/plain", b"hello").unwrap();

        assert_eq!(upload.file_data, "data:text/plain;base64,aGVsbG8=");
        assert_eq!(upload.filename, "note.txt");
        assert_eq!(upload.file_type, "text/plain");
    }
}
