use crate::config::AppConfig;
use crate::error::AppError;
use crate::listing::ListerFactory;
use crate::photo::Photo;
use crate::walker;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

/// Orchestrates one retrieval cycle per call: acquire a session, walk the
/// tree, release the session on every exit path.
pub struct PhotoService {
    factory: Arc<dyn ListerFactory>,
    config: AppConfig,
}

impl PhotoService {
    pub fn new(factory: Arc<dyn ListerFactory>, config: AppConfig) -> Self {
        Self { factory, config }
    }

    pub async fn get_photos(&self) -> Result<Vec<Photo>, AppError> {
        log::info!("Starting photo retrieval from the FTP server");

        let mut session = self.factory.create();
        let result = async {
            session.connect().await?;
            let mut photos = Vec::new();
            walker::collect_photos(
                &mut *session,
                &self.config.root_directory,
                &self.config.target_folder_name,
                &self.config.file_name_prefix,
                &mut photos,
            )
            .await;
            Ok::<Vec<Photo>, AppError>(photos)
        }
        .await;
        session.disconnect().await;

        let photos = result?;
        log::info!("Photo retrieval finished, {} photos found", photos.len());

        if photos.is_empty() {
            return Err(AppError::NoResults);
        }
        Ok(photos)
    }

    /// Answer a single-item metadata query against a local path. This does
    /// not touch the FTP server.
    pub fn get_photo_info(&self, path: &str) -> Result<Photo, AppError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            log::error!("File not found: {} ({})", path, e);
            AppError::NotFound(path.to_string())
        })?;

        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let creation_time = metadata.modified().ok().map(DateTime::<Utc>::from);

        Ok(Photo {
            name,
            path: path.to_string(),
            creation_time,
            size: metadata.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{RawEntry, RemoteLister};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_config() -> AppConfig {
        AppConfig {
            ftp_host: "localhost".to_string(),
            ftp_port: 21,
            ftp_user: "user".to_string(),
            ftp_password: "secret".to_string(),
            root_directory: "/".to_string(),
            target_folder_name: "photos".to_string(),
            file_name_prefix: "GRP327_".to_string(),
            web_port: 8080,
            log_level: "info".to_string(),
        }
    }

    fn dir(name: &str) -> RawEntry {
        RawEntry {
            name: name.to_string(),
            is_dir: true,
            modified: None,
            size: 0,
        }
    }

    fn file(name: &str, size: u64) -> RawEntry {
        RawEntry {
            name: name.to_string(),
            is_dir: false,
            modified: None,
            size,
        }
    }

    struct FakeSession {
        listings: HashMap<String, Vec<RawEntry>>,
        fail_connect: bool,
        connects: Arc<AtomicUsize>,
        disconnects: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RemoteLister for FakeSession {
        async fn connect(&mut self) -> Result<(), AppError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self.fail_connect {
                return Err(AppError::Connection("refused".to_string()));
            }
            Ok(())
        }

        async fn list(&mut self, path: &str) -> Result<Vec<RawEntry>, AppError> {
            Ok(self.listings.get(path).cloned().unwrap_or_default())
        }

        async fn disconnect(&mut self) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakeFactory {
        listings: HashMap<String, Vec<RawEntry>>,
        fail_connect: bool,
        connects: Arc<AtomicUsize>,
        disconnects: Arc<AtomicUsize>,
    }

    impl FakeFactory {
        fn new(listings: Vec<(&str, Vec<RawEntry>)>, fail_connect: bool) -> Self {
            Self {
                listings: listings
                    .into_iter()
                    .map(|(path, entries)| (path.to_string(), entries))
                    .collect(),
                fail_connect,
                connects: Arc::new(AtomicUsize::new(0)),
                disconnects: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl ListerFactory for FakeFactory {
        fn create(&self) -> Box<dyn RemoteLister> {
            Box::new(FakeSession {
                listings: self.listings.clone(),
                fail_connect: self.fail_connect,
                connects: self.connects.clone(),
                disconnects: self.disconnects.clone(),
            })
        }
    }

    fn service(factory: FakeFactory) -> (PhotoService, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let connects = factory.connects.clone();
        let disconnects = factory.disconnects.clone();
        (
            PhotoService::new(Arc::new(factory), test_config()),
            connects,
            disconnects,
        )
    }

    #[tokio::test]
    async fn returns_photos_and_releases_session_once() {
        let factory = FakeFactory::new(
            vec![
                ("/", vec![dir("alpha")]),
                ("/alpha", vec![dir("photos")]),
                ("/alpha/photos", vec![file("GRP327_1.jpg", 2048)]),
            ],
            false,
        );
        let (service, connects, disconnects) = service(factory);

        let photos = service.get_photos().await.unwrap();

        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].name, "GRP327_1.jpg");
        assert_eq!(connects.load(Ordering::SeqCst), 1);
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_walk_reports_no_results_and_releases_session() {
        let factory = FakeFactory::new(vec![("/", vec![dir("alpha")])], false);
        let (service, _, disconnects) = service(factory);

        let result = service.get_photos().await;

        assert!(matches!(result, Err(AppError::NoResults)));
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn connect_failure_propagates_and_still_releases_session() {
        let factory = FakeFactory::new(vec![], true);
        let (service, connects, disconnects) = service(factory);

        let result = service.get_photos().await;

        assert!(matches!(result, Err(AppError::Connection(_))));
        assert_eq!(connects.load(Ordering::SeqCst), 1);
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn each_call_uses_a_fresh_session() {
        let factory = FakeFactory::new(
            vec![("/", vec![dir("photos")]), ("/photos", vec![file("GRP327_1.jpg", 1)])],
            false,
        );
        let (service, connects, disconnects) = service(factory);

        service.get_photos().await.unwrap();
        service.get_photos().await.unwrap();

        assert_eq!(connects.load(Ordering::SeqCst), 2);
        assert_eq!(disconnects.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn photo_info_stats_a_local_file() {
        let factory = FakeFactory::new(vec![], false);
        let (service, _, _) = service(factory);

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"jpeg bytes").unwrap();
        let path = tmp.path().to_string_lossy().into_owned();

        let photo = service.get_photo_info(&path).unwrap();

        assert_eq!(photo.path, path);
        assert_eq!(photo.size, 9);
        assert!(photo.creation_time.is_some());
        assert_eq!(
            photo.name,
            tmp.path().file_name().unwrap().to_string_lossy()
        );
    }

    #[test]
    fn photo_info_reports_missing_path_as_not_found() {
        let factory = FakeFactory::new(vec![], false);
        let (service, _, _) = service(factory);

        let result = service.get_photo_info("/definitely/not/here.jpg");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
