//! Local storage integration tests
//!
//! Runs whole batches through the processor and the HTTP app with uploads
//! on local disk and the log next to them.

#[cfg(test)]
mod tests {
    use crate::common::{BatchFactory, fixed_time};
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::{test, web};
    use calamine::{Data, Reader, open_workbook_auto};
    use programme_portal::config::Config;
    use programme_portal::server::AppState;
    use programme_portal::server::server::HttpServer;
    use programme_portal::storage::files::{FileStore, LocalStorage};
    use programme_portal::storage::log::{LogAppender, XlsxSubmissionLog};
    use programme_portal::submission::{
        BatchState, LOG_HEADERS, ProcessorSettings, SubmissionProcessor, UploadedFile,
    };
    use programme_portal::utils::error::PortalError;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Portal {
        dir: TempDir,
        files: Arc<LocalStorage>,
        log: Arc<XlsxSubmissionLog>,
    }

    impl Portal {
        async fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let files = Arc::new(LocalStorage::new(dir.path().join("uploads")).await.unwrap());
            let log = Arc::new(XlsxSubmissionLog::new(dir.path().join("summary.xlsx")));
            Self { dir, files, log }
        }

        fn processor(&self, snapshot_after_batch: bool) -> SubmissionProcessor {
            SubmissionProcessor::new(
                self.files.clone(),
                self.log.clone(),
                ProcessorSettings {
                    snapshot_after_batch,
                },
            )
        }

        fn uploads(&self) -> Vec<String> {
            let mut names: Vec<String> = std::fs::read_dir(self.dir.path().join("uploads"))
                .unwrap()
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .filter(|name| !name.starts_with('.'))
                .collect();
            names.sort();
            names
        }
    }

    fn read_sheet(path: &Path) -> Vec<Vec<String>> {
        let mut workbook = open_workbook_auto(path).unwrap();
        let sheet = workbook.sheet_names()[0].clone();
        let range = workbook.worksheet_range(&sheet).unwrap();
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::String(s) => s.clone(),
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_four_complete_programmes() {
        let portal = Portal::new().await;
        let batch = BatchFactory::with_complete(
            "School of Engineering",
            &[
                (1, "Computer Science"),
                (2, "Civil Engineering"),
                (3, "Data Science"),
                (4, "Robotics"),
            ],
        );

        let report = portal
            .processor(false)
            .process_at(&batch, fixed_time())
            .await
            .unwrap();

        assert_eq!(report.state, BatchState::Completed);
        assert_eq!(report.rows.len(), 4);
        assert_eq!(report.stored_files.len(), 16);
        assert_eq!(report.warnings().count(), 0);
        assert_eq!(portal.uploads().len(), 16);

        let sheet = read_sheet(portal.log.path());
        assert_eq!(sheet.len(), 5);
        assert_eq!(sheet[0], LOG_HEADERS.map(String::from).to_vec());
        assert_eq!(
            sheet[4],
            vec![
                "2024-05-01 14:30:05",
                "School of Engineering",
                "Robotics",
                "P4_Robotics_School_of_Engineering_Excel_curriculum.xlsx",
                "P4_Robotics_School_of_Engineering_2022-2023_report.pdf",
                "P4_Robotics_School_of_Engineering_2023-2024_review.docx",
                "P4_Robotics_School_of_Engineering_2024-2025_minutes.doc",
            ]
        );
    }

    #[tokio::test]
    async fn test_slash_in_programme_name_stops_batch() {
        let portal = Portal::new().await;
        let batch = BatchFactory::with_complete(
            "Science",
            &[(1, "Physics"), (2, "CS/IT"), (3, "Maths")],
        );

        let err = portal
            .processor(false)
            .process_at(&batch, fixed_time())
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::FileStorage(_)));

        let rows = portal.log.rows().await.unwrap();
        let programmes: Vec<&str> = rows.iter().map(|r| r.programme.as_str()).collect();
        assert_eq!(programmes, ["Physics"]);
        assert!(portal.uploads().iter().all(|name| name.starts_with("P1_")));
    }

    #[tokio::test]
    async fn test_incomplete_and_rejected_programmes_are_skipped() {
        let portal = Portal::new().await;
        let mut batch = BatchFactory::with_complete("Arts", &[(2, "History")]);
        BatchFactory::partial(&mut batch, 1, "Music");
        BatchFactory::fill(&mut batch, 3, "Drama");
        batch.programme_mut(3).unwrap().spreadsheet =
            Some(UploadedFile::new("curriculum.csv", b"a,b".to_vec()));

        let report = portal
            .processor(false)
            .process_at(&batch, fixed_time())
            .await
            .unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].programme, "History");

        let warnings: Vec<_> = report.warnings().collect();
        assert_eq!(warnings.len(), 3);
        assert_eq!(warnings[0].programme, Some(1));
        assert_eq!(warnings[1].programme, Some(3));
        assert_eq!(warnings[2].programme, Some(4));
        assert!(
            portal
                .uploads()
                .iter()
                .all(|name| name.starts_with("P2_History_Arts_"))
        );
    }

    #[tokio::test]
    async fn test_batches_accumulate_in_order() {
        let portal = Portal::new().await;
        let processor = portal.processor(false);

        let first = BatchFactory::with_complete("Science", &[(1, "Physics")]);
        let second = BatchFactory::with_complete("Science", &[(1, "Chemistry"), (2, "Biology")]);
        processor.process_at(&first, fixed_time()).await.unwrap();
        processor.process(&second).await.unwrap();

        let rows = portal.log.rows().await.unwrap();
        let programmes: Vec<&str> = rows.iter().map(|r| r.programme.as_str()).collect();
        assert_eq!(programmes, ["Physics", "Chemistry", "Biology"]);
        assert_eq!(rows[0].timestamp, "2024-05-01 14:30:05");
    }

    #[tokio::test]
    async fn test_identical_resubmission_overwrites_files_and_adds_a_row() {
        let portal = Portal::new().await;
        let processor = portal.processor(false);
        let batch = BatchFactory::with_complete("Law", &[(1, "Public Law")]);

        processor.process_at(&batch, fixed_time()).await.unwrap();
        processor.process_at(&batch, fixed_time()).await.unwrap();

        assert_eq!(portal.uploads().len(), 4);
        assert_eq!(portal.log.rows().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_lands_in_file_storage() {
        let portal = Portal::new().await;
        let batch = BatchFactory::with_complete("Medicine", &[(1, "Nursing")]);

        let report = portal
            .processor(true)
            .process_at(&batch, fixed_time())
            .await
            .unwrap();

        let snapshot = report.snapshot.unwrap();
        assert_eq!(snapshot, "submissions_summary_2024-05-01_14-30-05.xlsx");
        let stored = portal.files.get(&snapshot).await.unwrap();
        let current = portal.log.snapshot().await.unwrap().unwrap();
        assert_eq!(stored, current);
    }

    #[actix_web::test]
    async fn test_concurrent_requests_are_serialized() {
        let portal = Portal::new().await;
        let state = AppState::new(Config::default(), portal.files.clone(), portal.log.clone());
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let request = |programme: &str| {
            let boundary = "concurrent-boundary";
            let mut body = String::new();
            for (name, value) in [("department", "Business"), ("p1_name", programme)] {
                body.push_str(&format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                ));
            }
            for (field, file) in [
                ("p1_excel", "plan.xls"),
                ("p1_doc_2022_2023", "a.pdf"),
                ("p1_doc_2023_2024", "b.pdf"),
                ("p1_doc_2024_2025", "c.pdf"),
            ] {
                body.push_str(&format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file}\"\r\n\r\ncontent\r\n"
                ));
            }
            body.push_str(&format!("--{boundary}--\r\n"));

            test::TestRequest::post()
                .uri("/api/submissions")
                .insert_header((
                    CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                ))
                .set_payload(body)
                .to_request()
        };

        let (a, b) = futures::join!(
            test::call_service(&app, request("Marketing")),
            test::call_service(&app, request("Finance")),
        );
        assert!(a.status().is_success());
        assert!(b.status().is_success());

        let mut programmes: Vec<String> = portal
            .log
            .rows()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.programme)
            .collect();
        programmes.sort();
        assert_eq!(programmes, ["Finance", "Marketing"]);
    }
}
