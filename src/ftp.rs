//! FTP-backed implementation of the remote listing session.
//!
//! Uses the suppaftp crate. MLSD (RFC 3659) listings are preferred when the
//! server advertises them; otherwise classic LIST output is parsed, trying
//! the Unix `ls -l` shape first and the DOS shape second.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use suppaftp::tokio::AsyncNativeTlsFtpStream;
use suppaftp::types::FileType;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::listing::{ListerFactory, RawEntry, RemoteLister};

pub struct FtpSession {
    config: AppConfig,
    stream: Option<AsyncNativeTlsFtpStream>,
    /// Whether the server supports MLSD/MLST (RFC 3659)
    mlsd_supported: bool,
}

impl FtpSession {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            stream: None,
            mlsd_supported: false,
        }
    }

    fn stream_mut(&mut self) -> Result<&mut AsyncNativeTlsFtpStream, AppError> {
        self.stream
            .as_mut()
            .ok_or_else(|| AppError::Connection("not connected".to_string()))
    }
}

#[async_trait]
impl RemoteLister for FtpSession {
    async fn connect(&mut self) -> Result<(), AppError> {
        let addr = format!("{}:{}", self.config.ftp_host, self.config.ftp_port);
        log::info!("Connecting to FTP server at {}", addr);

        let mut stream = AsyncNativeTlsFtpStream::connect(&addr)
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;

        stream
            .login(self.config.ftp_user.as_str(), self.config.ftp_password.as_str())
            .await
            .map_err(|e| AppError::Connection(format!("login failed: {}", e)))?;

        stream
            .transfer_type(FileType::Binary)
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;

        self.mlsd_supported = match stream.feat().await {
            Ok(features) => features.contains_key("MLST") || features.contains_key("MLSD"),
            Err(_) => false,
        };

        log::info!(
            "FTP session established (MLSD supported: {})",
            self.mlsd_supported
        );
        self.stream = Some(stream);
        Ok(())
    }

    async fn list(&mut self, path: &str) -> Result<Vec<RawEntry>, AppError> {
        log::debug!("Listing FTP directory: {}", path);

        if self.mlsd_supported {
            let stream = self.stream_mut()?;
            match stream.mlsd(Some(path)).await {
                Ok(lines) => {
                    let entries = lines
                        .iter()
                        .filter_map(|line| parse_mlsd_entry(line))
                        .collect();
                    return Ok(entries);
                }
                Err(e) => {
                    log::debug!("MLSD failed for {} ({}), falling back to LIST", path, e);
                }
            }
        }

        let stream = self.stream_mut()?;
        let lines = stream
            .list(Some(path))
            .await
            .map_err(|e| AppError::Listing(e.to_string()))?;

        let entries = lines
            .iter()
            .filter_map(|line| parse_listing_line(line))
            .collect();
        Ok(entries)
    }

    async fn disconnect(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.quit().await {
                log::error!("Failed to close FTP session: {}", e);
            } else {
                log::info!("Disconnected from FTP server");
            }
        }
    }
}

/// Creates one unconnected [`FtpSession`] per retrieval call.
pub struct FtpSessionFactory {
    config: AppConfig,
}

impl FtpSessionFactory {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl ListerFactory for FtpSessionFactory {
    fn create(&self) -> Box<dyn RemoteLister> {
        Box::new(FtpSession::new(self.config.clone()))
    }
}

/// Parse one LIST line, trying the Unix format first and DOS second.
fn parse_listing_line(line: &str) -> Option<RawEntry> {
    parse_unix_listing(line).or_else(|| parse_dos_listing(line))
}

/// Unix-style listing (`ls -l` format):
/// `drwxr-xr-x 2 user group 4096 Jan 20 10:00 name`
fn parse_unix_listing(line: &str) -> Option<RawEntry> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 9 {
        return None;
    }

    let permissions = parts[0];
    let is_dir = permissions.starts_with('d');
    let is_symlink = permissions.starts_with('l');

    let size: u64 = parts[4].parse().unwrap_or(0);

    // Name is everything after the 8th part, to handle spaces in names
    let name = parts[8..].join(" ");

    // Symlink lines carry "name -> target"; only the name matters here
    let name = if is_symlink && name.contains(" -> ") {
        name.splitn(2, " -> ").next().unwrap_or("").to_string()
    } else {
        name
    };

    if name == "." || name == ".." {
        return None;
    }

    let modified = parse_unix_time(parts[5], parts[6], parts[7]);

    Some(RawEntry {
        name,
        is_dir,
        modified,
        size,
    })
}

/// DOS-style listing (Windows FTP servers):
/// `01-20-26  10:00AM       <DIR>          name` or
/// `01-20-26  10:00AM           12345      name`
fn parse_dos_listing(line: &str) -> Option<RawEntry> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }

    let is_dir = parts[2] == "<DIR>";
    let size: u64 = if is_dir { 0 } else { parts[2].parse().unwrap_or(0) };
    let name = parts[3..].join(" ");

    if name == "." || name == ".." {
        return None;
    }

    let modified = NaiveDateTime::parse_from_str(
        &format!("{} {}", parts[0], parts[1]),
        "%m-%d-%y %I:%M%p",
    )
    .ok()
    .map(|naive| naive.and_utc());

    Some(RawEntry {
        name,
        is_dir,
        modified,
        size,
    })
}

/// MLSD/MLST line (RFC 3659 machine-readable format):
/// `fact1=val1;fact2=val2; filename`
fn parse_mlsd_entry(line: &str) -> Option<RawEntry> {
    let (facts_str, name) = line.split_once(' ')?;
    let name = name.to_string();

    if name == "." || name == ".." {
        return None;
    }

    let facts_lower = facts_str.to_lowercase();
    if facts_lower.contains("type=cdir") || facts_lower.contains("type=pdir") {
        return None;
    }

    let mut is_dir = false;
    let mut size: u64 = 0;
    let mut modified: Option<DateTime<Utc>> = None;

    for fact in facts_str.split(';') {
        let fact = fact.trim();
        if fact.is_empty() {
            continue;
        }
        let (key, value) = match fact.split_once('=') {
            Some((k, v)) => (k.to_lowercase(), v),
            None => continue,
        };

        match key.as_str() {
            "type" => {
                is_dir = value.eq_ignore_ascii_case("dir");
            }
            "size" | "sizd" => {
                size = value.parse().unwrap_or(0);
            }
            "modify" => {
                modified = parse_mlsd_time(value);
            }
            _ => {}
        }
    }

    Some(RawEntry {
        name,
        is_dir,
        modified,
        size,
    })
}

/// MLSD `modify` fact: `YYYYMMDDHHMMSS[.sss]`, server-local UTC.
fn parse_mlsd_time(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.get(0..14)?;
    NaiveDateTime::parse_from_str(ts, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Unix LIST date tokens: `Mon day time-or-year`. The time form carries no
/// year, so the current year is assumed, matching common client behavior.
fn parse_unix_time(month: &str, day: &str, time_or_year: &str) -> Option<DateTime<Utc>> {
    if time_or_year.contains(':') {
        let year = Utc::now().year();
        NaiveDateTime::parse_from_str(
            &format!("{} {} {} {}", year, month, day, time_or_year),
            "%Y %b %e %H:%M",
        )
        .ok()
        .map(|naive| naive.and_utc())
    } else {
        NaiveDate::parse_from_str(
            &format!("{} {} {}", time_or_year, month, day),
            "%Y %b %e",
        )
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
    }
}
