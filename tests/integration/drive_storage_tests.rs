//! Drive storage integration tests
//!
//! Exercises the Drive backend against a mock Drive API, including the
//! service-account token exchange.

#[cfg(test)]
mod tests {
    use crate::common::drive::{TEST_ACCESS_TOKEN, TEST_FOLDER_ID};
    use crate::common::{BatchFactory, DriveMock, fixed_time};
    use programme_portal::config::FileStorageConfig;
    use programme_portal::storage::files::{DriveCredentials, DriveStorage, FileStorage, FileStore};
    use programme_portal::storage::log::XlsxSubmissionLog;
    use programme_portal::submission::{ProcessorSettings, SubmissionProcessor};
    use programme_portal::utils::error::PortalError;
    use serde_json::json;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::{NamedTempFile, TempDir};
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    fn key_file(mock: &DriveMock) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(mock.service_account_json().as_bytes()).unwrap();
        file
    }

    fn static_token_storage(mock: &DriveMock) -> DriveStorage {
        DriveStorage::with_credentials(
            &mock.config(),
            DriveCredentials::AccessToken(TEST_ACCESS_TOKEN.to_string()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_service_account_token_exchange() {
        let mock = DriveMock::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains(
                "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
            ))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TEST_ACCESS_TOKEN,
                "expires_in": 3600,
            })))
            .expect(1)
            .mount(&mock.server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/drive/v3/files/{TEST_FOLDER_ID}")))
            .and(header("authorization", format!("Bearer {TEST_ACCESS_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": TEST_FOLDER_ID})))
            .mount(&mock.server)
            .await;

        let key = key_file(&mock);
        let mut config = mock.config();
        config.credentials_file = Some(key.path().to_string_lossy().into_owned());

        // One token request covers construction and the health check
        let storage = DriveStorage::new(&config).await.unwrap();
        storage.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_token_request_is_auth_error() {
        let mock = DriveMock::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
            .mount(&mock.server)
            .await;

        let key = key_file(&mock);
        let mut config = mock.config();
        config.credentials_file = Some(key.path().to_string_lossy().into_owned());

        let err = DriveStorage::new(&config).await.unwrap_err();
        match err {
            PortalError::Auth(message) => assert!(message.contains("invalid_grant")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_is_config_error() {
        let mock = DriveMock::start().await;
        let mut config = mock.config();
        config.credentials_file = None;
        config.credentials_env = "PORTAL_TEST_UNSET_DRIVE_CREDENTIALS".to_string();

        let err = DriveStorage::new(&config).await.unwrap_err();
        assert!(matches!(err, PortalError::Config(_)));
    }

    #[tokio::test]
    async fn test_store_uploads_into_folder() {
        let mock = DriveMock::start().await;
        mock.mount_upload("drive-object-1").await;

        let storage = static_token_storage(&mock);
        let name = storage
            .store("P1_CS_Eng_2022-2023_a.pdf", "application/pdf", b"%PDF-1.4")
            .await
            .unwrap();
        assert_eq!(name, "P1_CS_Eng_2022-2023_a.pdf");

        let uploads = mock.uploads().await;
        assert_eq!(uploads.len(), 1);
        let request = &uploads[0];
        assert_eq!(
            request.headers.get("authorization").unwrap().to_str().unwrap(),
            format!("Bearer {TEST_ACCESS_TOKEN}")
        );
        assert!(
            request
                .headers
                .get("content-type")
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("multipart/related; boundary=")
        );

        let body = String::from_utf8_lossy(&request.body);
        assert!(body.contains(r#""name":"P1_CS_Eng_2022-2023_a.pdf""#));
        assert!(body.contains(&format!(r#""parents":["{TEST_FOLDER_ID}"]"#)));
        assert!(body.contains("Content-Type: application/pdf\r\n\r\n%PDF-1.4"));
    }

    #[tokio::test]
    async fn test_get_resolves_newest_object_by_name() {
        let mock = DriveMock::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("orderBy", "createdTime desc"))
            .and(query_param("pageSize", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{"id": "newest", "name": "plan.xlsx"}]
            })))
            .mount(&mock.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files/newest"))
            .and(query_param("alt", "media"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"sheet-bytes".to_vec()))
            .mount(&mock.server)
            .await;

        let storage = static_token_storage(&mock);
        assert_eq!(storage.find("plan.xlsx").await.unwrap().as_deref(), Some("newest"));
        assert_eq!(storage.get("plan.xlsx").await.unwrap(), b"sheet-bytes");

        let lookups = mock.server.received_requests().await.unwrap();
        let query = lookups[0].url.query().unwrap_or_default().to_string();
        assert!(query.contains("supportsAllDrives=true"));
        assert!(query.contains("includeItemsFromAllDrives=true"));
    }

    #[tokio::test]
    async fn test_get_missing_object_is_not_found() {
        let mock = DriveMock::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
            .mount(&mock.server)
            .await;

        let storage = static_token_storage(&mock);
        assert_eq!(storage.find("gone.pdf").await.unwrap(), None);
        let err = storage.get("gone.pdf").await.unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_health_check_maps_failures() {
        let mock = DriveMock::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/drive/v3/files/{TEST_FOLDER_ID}")))
            .respond_with(ResponseTemplate::new(403).set_body_string("insufficient permissions"))
            .mount(&mock.server)
            .await;

        let storage = static_token_storage(&mock);
        let err = storage.health_check().await.unwrap_err();
        assert!(matches!(err, PortalError::Auth(_)));
    }

    #[tokio::test]
    async fn test_upload_failure_is_storage_error() {
        let mock = DriveMock::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/drive/v3/files"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
            .mount(&mock.server)
            .await;

        let storage = static_token_storage(&mock);
        let err = storage
            .store("a.pdf", "application/pdf", b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::FileStorage(_)));
    }

    #[tokio::test]
    async fn test_unreachable_drive_is_network_error() {
        let mock = DriveMock::start().await;
        let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", closed.local_addr().unwrap());
        drop(closed);

        let mut config = mock.config();
        config.api_base = base.clone();
        config.upload_base = base;
        let storage = DriveStorage::with_credentials(
            &config,
            DriveCredentials::AccessToken(TEST_ACCESS_TOKEN.to_string()),
        )
        .unwrap();

        let err = storage
            .store("a.pdf", "application/pdf", b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Network(_)));
        let err = storage.health_check().await.unwrap_err();
        assert!(matches!(err, PortalError::Network(_)));
    }

    #[tokio::test]
    async fn test_batch_on_drive_uploads_files_and_snapshot() {
        let mock = DriveMock::start().await;
        mock.mount_token().await;
        mock.mount_upload("drive-object").await;

        let key = key_file(&mock);
        let mut drive = mock.config();
        drive.credentials_file = Some(key.path().to_string_lossy().into_owned());
        let storage_config = FileStorageConfig {
            storage_type: "drive".to_string(),
            local_path: None,
            drive: Some(drive),
        };
        let files = FileStorage::new(&storage_config).await.unwrap();
        assert_eq!(files.backend_name(), "drive");

        let dir = TempDir::new().unwrap();
        let log = XlsxSubmissionLog::new(dir.path().join("summary.xlsx"));
        let processor = SubmissionProcessor::new(
            Arc::new(files),
            Arc::new(log),
            ProcessorSettings {
                snapshot_after_batch: true,
            },
        );

        let batch = BatchFactory::with_complete("Engineering", &[(1, "Computer Science")]);
        let report = processor.process_at(&batch, fixed_time()).await.unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(
            report.stored_files[0],
            "P1_Computer_Science_Engineering_Excel_curriculum.xlsx"
        );
        assert_eq!(
            report.snapshot.as_deref(),
            Some("submissions_summary_2024-05-01_14-30-05.xlsx")
        );

        let uploads = mock.uploads().await;
        assert_eq!(uploads.len(), 5);
        let last = String::from_utf8_lossy(&uploads[4].body);
        assert!(last.contains("submissions_summary_2024-05-01_14-30-05.xlsx"));
        assert!(last.contains(
            "Content-Type: application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ));
    }

    #[tokio::test]
    async fn test_empty_batch_touches_nothing() {
        let mock = DriveMock::start().await;
        let storage = static_token_storage(&mock);
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("summary.xlsx");
        let processor = SubmissionProcessor::new(
            Arc::new(storage),
            Arc::new(XlsxSubmissionLog::new(&log_path)),
            ProcessorSettings {
                snapshot_after_batch: true,
            },
        );

        let report = processor
            .process_at(&BatchFactory::empty("Engineering"), fixed_time())
            .await
            .unwrap();

        assert!(report.rows.is_empty());
        assert!(report.snapshot.is_none());
        assert_eq!(report.warnings().count(), 4);
        assert!(mock.server.received_requests().await.unwrap().is_empty());
        assert!(!log_path.exists());
    }
}
