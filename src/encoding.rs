//! Repairs for the mixed encodings the FTP server returns in listings.
//!
//! The server percent-encodes entry names but sends directory paths either
//! with stray whitespace or as windows-1251 byte sequences, depending on the
//! share. Both repairs live here so the walker never has to know which case
//! it hit.

use crate::error::AppError;
use encoding_rs::WINDOWS_1251;

/// Percent-decode an entry name from a directory listing.
///
/// Decoded bytes are interpreted as UTF-8; anything else is an error the
/// caller is expected to log and skip.
pub fn decode_name(name: &str) -> Result<String, AppError> {
    urlencoding::decode(name)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| AppError::Decoding(format!("{:?}: {}", name, e)))
}

/// Rewrite a directory path into the form the server accepts for listing
/// calls.
///
/// Paths containing whitespace have every whitespace character removed;
/// all other paths are reinterpreted byte-for-byte as windows-1251. This
/// mirrors observed server behavior and is not a real charset negotiation.
pub fn repair_path(path: &str) -> String {
    if path.chars().any(char::is_whitespace) {
        path.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        let (decoded, _, _) = WINDOWS_1251.decode(path.as_bytes());
        decoded.into_owned()
    }
}
