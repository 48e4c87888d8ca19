//! Submission log integration tests
//!
//! Appends to workbooks that were created or edited outside the portal.

#[cfg(test)]
mod tests {
    use programme_portal::storage::log::{LogAppender, LogSheet, XlsxSubmissionLog};
    use programme_portal::submission::{LOG_HEADERS, LogRow};
    use rust_xlsxwriter::Workbook;
    use std::path::Path;
    use tempfile::TempDir;

    fn row(programme: &str) -> LogRow {
        LogRow {
            timestamp: "2024-05-01 14:30:05".to_string(),
            department: "Engineering".to_string(),
            programme: programme.to_string(),
            excel_file: format!("P1_{programme}_Engineering_Excel_plan.xlsx"),
            ay_2022_2023: format!("P1_{programme}_Engineering_2022-2023_a.pdf"),
            ay_2023_2024: format!("P1_{programme}_Engineering_2023-2024_b.pdf"),
            ay_2024_2025: format!("P1_{programme}_Engineering_2024-2025_c.pdf"),
        }
    }

    fn write_workbook(path: &Path, sheet: &str, rows: &[&[&str]]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet).unwrap();
        for (r, cells) in rows.iter().enumerate() {
            for (c, value) in cells.iter().enumerate() {
                worksheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    #[tokio::test]
    async fn test_append_to_reordered_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.xlsx");
        write_workbook(
            &path,
            "Sheet1",
            &[
                &[
                    "Programme",
                    "Timestamp",
                    "Department",
                    "Reviewer",
                    "Excel File",
                    "AY 2022-2023",
                    "AY 2023-2024",
                    "AY 2024-2025",
                ],
                &["Old Programme", "2023-01-01 09:00:00", "Engineering", "Dr. Ada"],
            ],
        );

        let log = XlsxSubmissionLog::new(&path);
        log.append(&row("Robotics")).await.unwrap();

        let rows = log.rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].programme, "Old Programme");
        assert_eq!(rows[0].timestamp, "2023-01-01 09:00:00");
        assert_eq!(rows[1], row("Robotics"));

        let sheet = LogSheet::load(&path).unwrap();
        assert_eq!(sheet.headers()[0], "Programme");
        assert_eq!(sheet.headers()[3], "Reviewer");
    }

    #[tokio::test]
    async fn test_missing_headers_are_added() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.xlsx");
        write_workbook(
            &path,
            "Log",
            &[&["Timestamp", "Department", "Programme"], &["t", "d", "p"]],
        );

        let log = XlsxSubmissionLog::new(&path);
        log.append(&row("Physics")).await.unwrap();

        let sheet = LogSheet::load(&path).unwrap();
        for header in LOG_HEADERS {
            assert!(sheet.headers().iter().any(|h| h == header), "{header}");
        }
        let rows = sheet.log_rows();
        assert_eq!(rows[0].programme, "p");
        assert_eq!(rows[0].excel_file, "");
        assert_eq!(rows[1], row("Physics"));
    }

    #[tokio::test]
    async fn test_no_temporary_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("summary.xlsx");

        let log = XlsxSubmissionLog::new(&path);
        log.append(&row("Chemistry")).await.unwrap();
        log.append(&row("Biology")).await.unwrap();

        let entries: Vec<String> = std::fs::read_dir(dir.path().join("logs"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, ["summary.xlsx"]);
    }
}
