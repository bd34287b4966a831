use crate::encoding;
use crate::error::AppError;
use crate::listing::RawEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single photo found on the FTP server. The timestamp is whatever the
/// server reported for the entry, not a client-side clock.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Photo {
    pub name: String,
    pub path: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub size: u64,
}

impl Photo {
    /// Build a record from a listing entry and the path of the directory
    /// that contained it. The name is expected to be decoded already; the
    /// containing path goes through name decoding here.
    pub fn from_entry(name: &str, entry: &RawEntry, folder_path: &str) -> Result<Self, AppError> {
        let path = encoding::decode_name(folder_path)?;
        Ok(Photo {
            name: name.to_string(),
            path,
            creation_time: entry.modified,
            size: entry.size,
        })
    }
}
