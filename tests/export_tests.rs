use admin_tables::data::data_provider::{DataProvider, StaticDataProvider};
use admin_tables::export::csv_export::records_to_csv;
use admin_tables::export::data_exporter::DataExporter;
use admin_tables::export::reports::{export_analytics, export_report, ReportKind};
use admin_tables::{DirectorySink, DownloadSink, ExportFormat, Record};
use chrono::{DateTime, Local, TimeZone};
use std::path::PathBuf;

fn get_test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("data");
    path.push(filename);
    path
}

fn load_dashboard() -> StaticDataProvider {
    StaticDataProvider::load_json_file(get_test_data_path("dashboard.json"))
        .expect("Failed to load dashboard.json")
}

fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 12, 24, 8, 0, 0).unwrap()
}

#[test]
fn test_comma_field_is_quoted() {
    let records = vec![Record::new().with("Name", "A, B").with("Age", 5)];
    let csv = records_to_csv(&records).unwrap();
    assert_eq!(csv, "Name,Age\r\n\"A, B\",5\r\n");
}

#[test]
fn test_csv_round_trip_through_reader() {
    let records = vec![
        Record::new().with("id", "1").with("note", "He said \"hi\", then left"),
        Record::new().with("id", "2").with("note", "line one\nline two"),
        Record::new().with("id", "3").with("note", "plain"),
    ];
    let csv = records_to_csv(&records).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["id", "note"]);

    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    let expected: Vec<Vec<String>> = records
        .iter()
        .map(|r| vec![r.display_value("id"), r.display_value("note")])
        .collect();
    assert_eq!(rows, expected);
}

#[test]
fn test_user_report_csv_from_fixture() {
    let provider = load_dashboard();
    let users = provider.dataset("users").unwrap();
    let artifact = export_report(
        &DataExporter::default(),
        ReportKind::Users,
        users.iter(),
        ExportFormat::Csv,
        now(),
    )
    .unwrap();
    assert_eq!(artifact.file_name, "users_2024-12-24.csv");

    let mut reader = csv::Reader::from_reader(artifact.bytes.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec!["ID", "Name", "Email", "Phone", "Status", "Registration Date", "Chronic Conditions"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(&rows[0][6], "Fibromyalgia, Chronic Back Pain");
    assert_eq!(&rows[2][6], "N/A");
    assert_eq!(&rows[3][1], "James \"Jim\" Wilson");
    assert_eq!(&rows[3][6], "N/A");
    assert_eq!(&rows[4][3], "");
}

#[test]
fn test_empty_report_is_header_only() {
    let artifact = export_report(
        &DataExporter::default(),
        ReportKind::QuestionnaireResponses,
        std::iter::empty::<&Record>(),
        ExportFormat::Csv,
        now(),
    )
    .unwrap();
    assert_eq!(
        String::from_utf8(artifact.bytes).unwrap(),
        "ID,User,Questionnaire,Domain,Date,Status,Score\r\n"
    );

    let pdf = export_report(
        &DataExporter::default(),
        ReportKind::AdminLogs,
        std::iter::empty::<&Record>(),
        ExportFormat::Pdf,
        now(),
    )
    .unwrap();
    let text = String::from_utf8_lossy(&pdf.bytes);
    assert!(text.contains("(Admin Activity Logs Report) Tj"));
    assert!(text.contains("(IP Address) Tj"));
}

#[test]
fn test_large_pdf_report_spans_pages() {
    let logs: Vec<Record> = (0..150)
        .map(|i| {
            Record::new()
                .with("id", format!("LOG{:03}", i))
                .with("adminName", "Admin User")
                .with("action", "Viewed a fairly long description of the audited action")
                .with("target", format!("U{:03}", i))
                .with("timestamp", "2024-12-23 14:32:10")
                .with("ipAddress", "192.168.1.10")
                .with("status", "Success")
        })
        .collect();
    let artifact = export_report(
        &DataExporter::default(),
        ReportKind::AdminLogs,
        &logs,
        ExportFormat::Pdf,
        now(),
    )
    .unwrap();
    let text = String::from_utf8_lossy(&artifact.bytes);
    assert!(text.starts_with("%PDF-1.4"));
    assert!(!text.contains("/Count 1 "));
    assert!(text.contains("(LOG149) Tj"));
}

#[test]
fn test_analytics_export_to_directory() {
    let provider = load_dashboard();
    let snapshot = provider.analytics().unwrap();
    let artifact = export_analytics(&DataExporter::default(), snapshot, ExportFormat::Pdf, now()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path());
    let path = sink.deliver(&artifact).unwrap();

    assert_eq!(path, dir.path().join("analytics_report_2024-12-24.pdf"));
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, artifact.bytes);
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
        .collect();
    assert!(leftovers.is_empty());
}
