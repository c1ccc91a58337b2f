//! Report exporters for the admin datasets
//!
//! Each report maps domain records onto a fixed set of export fields,
//! then hands them to the generic CSV or PDF path.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::data::record::{FieldValue, Record};
use crate::export::artifact::{ExportArtifact, ExportFormat};
use crate::export::csv_export::write_csv;
use crate::export::data_exporter::DataExporter;
use crate::export::pdf::{PdfDocument, Rgb, StandardFont, TableSpec};
use crate::export::ExportColumn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportKind {
    Users,
    QuestionnaireResponses,
    AdminLogs,
}

/// (export header, source field)
const USER_FIELDS: &[(&str, &str)] = &[
    ("ID", "id"),
    ("Name", "name"),
    ("Email", "email"),
    ("Phone", "phone"),
    ("Status", "status"),
    ("Registration Date", "registrationDate"),
    ("Chronic Conditions", "baselineData.chronicConditions"),
];

const QUESTIONNAIRE_FIELDS: &[(&str, &str)] = &[
    ("ID", "id"),
    ("User", "userName"),
    ("Questionnaire", "questionnaireName"),
    ("Domain", "domain"),
    ("Date", "date"),
    ("Status", "status"),
    ("Score", "score"),
];

const ADMIN_LOG_FIELDS: &[(&str, &str)] = &[
    ("ID", "id"),
    ("Admin", "adminName"),
    ("Action", "action"),
    ("Target", "target"),
    ("Timestamp", "timestamp"),
    ("IP Address", "ipAddress"),
    ("Status", "status"),
];

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Users,
        ReportKind::QuestionnaireResponses,
        ReportKind::AdminLogs,
    ];

    /// File name stem
    pub fn base_name(self) -> &'static str {
        match self {
            ReportKind::Users => "users",
            ReportKind::QuestionnaireResponses => "questionnaire_responses",
            ReportKind::AdminLogs => "admin_logs",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Users => "User Management Report",
            ReportKind::QuestionnaireResponses => "Questionnaire Responses Report",
            ReportKind::AdminLogs => "Admin Activity Logs Report",
        }
    }

    fn fields(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ReportKind::Users => USER_FIELDS,
            ReportKind::QuestionnaireResponses => QUESTIONNAIRE_FIELDS,
            ReportKind::AdminLogs => ADMIN_LOG_FIELDS,
        }
    }

    /// Mapping over projected records; headers double as data keys
    pub fn columns(self) -> Vec<ExportColumn> {
        self.fields()
            .iter()
            .map(|(header, _)| ExportColumn::same(*header))
            .collect()
    }

    /// Map a domain record onto this report's export fields
    pub fn project(self, record: &Record) -> Record {
        self.fields()
            .iter()
            .map(|(header, source)| {
                let value = match (self, *header) {
                    (ReportKind::Users, "Chronic Conditions") => chronic_conditions(record),
                    _ => record.get_path(source).cloned().unwrap_or(FieldValue::Null),
                };
                (header.to_string(), value)
            })
            .collect()
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}

fn chronic_conditions(record: &Record) -> FieldValue {
    let joined = match record.get_path("baselineData.chronicConditions") {
        Some(FieldValue::List(items)) => items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Some(FieldValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    if joined.is_empty() {
        FieldValue::from("N/A")
    } else {
        FieldValue::String(joined)
    }
}

/// Export one of the admin reports in the requested format
pub fn export_report<'a>(
    exporter: &DataExporter,
    kind: ReportKind,
    records: impl IntoIterator<Item = &'a Record>,
    format: ExportFormat,
    now: DateTime<Local>,
) -> Result<ExportArtifact> {
    let projected: Vec<Record> = records.into_iter().map(|r| kind.project(r)).collect();
    exporter
        .export_records(
            &projected,
            &kind.columns(),
            kind.base_name(),
            format,
            Some(kind.title()),
            now,
        )
        .with_context(|| format!("Failed to export {} report", kind))
}

pub const ANALYTICS_BASE_NAME: &str = "analytics_report";
pub const ANALYTICS_TITLE: &str = "Analytics Report";
pub const ANALYTICS_HEADING: &str = "Global Usage Statistics";

/// Platform-wide usage counters shown on the analytics page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalUsageStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_sessions: u64,
    pub average_session_duration: String,
    pub total_exercises_completed: u64,
    pub total_assessments_completed: u64,
    pub user_growth: String,
    pub engagement: String,
}

impl GlobalUsageStats {
    /// Metric/value pairs in report order
    pub fn metrics(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total Users", self.total_users.to_string()),
            ("Active Users", self.active_users.to_string()),
            ("Total Sessions", self.total_sessions.to_string()),
            ("Average Session Duration", self.average_session_duration.clone()),
            ("Total Exercises Completed", self.total_exercises_completed.to_string()),
            ("Total Assessments Completed", self.total_assessments_completed.to_string()),
            ("User Growth", self.user_growth.clone()),
            ("Engagement Rate", self.engagement.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSnapshot {
    pub global_usage_stats: GlobalUsageStats,
}

/// Export the analytics summary as a Metric/Value table
pub fn export_analytics(
    exporter: &DataExporter,
    snapshot: &AnalyticsSnapshot,
    format: ExportFormat,
    now: DateTime<Local>,
) -> Result<ExportArtifact> {
    let head = vec!["Metric".to_string(), "Value".to_string()];
    let body: Vec<Vec<String>> = snapshot
        .global_usage_stats
        .metrics()
        .into_iter()
        .map(|(metric, value)| vec![metric.to_string(), value])
        .collect();

    let bytes = match format {
        ExportFormat::Csv => write_csv(&head, body)
            .context("Failed to build analytics CSV")?
            .into_bytes(),
        ExportFormat::Pdf => {
            let mut doc = PdfDocument::new(exporter.style().clone()).with_title(ANALYTICS_TITLE);
            doc.text(14.0, 20.0, 20.0, Rgb::gray(40), StandardFont::Helvetica, ANALYTICS_TITLE);
            doc.text(
                14.0,
                30.0,
                10.0,
                Rgb::gray(100),
                StandardFont::Helvetica,
                &exporter.generated_caption(now),
            );
            doc.text(14.0, 45.0, 14.0, Rgb::gray(40), StandardFont::Helvetica, ANALYTICS_HEADING);
            doc.table(50.0, &TableSpec::new(head, body));
            doc.to_bytes().context("Failed to serialize analytics PDF")?
        }
    };

    let artifact = ExportArtifact::new(ANALYTICS_BASE_NAME, format, now.date_naive(), bytes);
    info!("Prepared {}", artifact.file_name);
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 9, 9, 30, 0).unwrap()
    }

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_user_projection_joins_conditions() {
        let user = record(json!({
            "id": "U001",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "555-0100",
            "status": "active",
            "registrationDate": "2024-01-15",
            "baselineData": {"chronicConditions": ["Fibromyalgia", "Migraine"]}
        }));
        let projected = ReportKind::Users.project(&user);
        assert_eq!(
            projected.field_names().collect::<Vec<_>>(),
            vec!["ID", "Name", "Email", "Phone", "Status", "Registration Date", "Chronic Conditions"]
        );
        assert_eq!(projected.display_value("Chronic Conditions"), "Fibromyalgia, Migraine");
        assert_eq!(projected.display_value("Registration Date"), "2024-01-15");
    }

    #[test]
    fn test_user_without_conditions_is_na() {
        let no_baseline = record(json!({"id": "U002", "name": "Sam"}));
        let empty_list = record(json!({"id": "U003", "baselineData": {"chronicConditions": []}}));
        for user in [no_baseline, empty_list] {
            let projected = ReportKind::Users.project(&user);
            assert_eq!(projected.display_value("Chronic Conditions"), "N/A");
        }
    }

    #[test]
    fn test_admin_log_csv_export() {
        let logs = vec![record(json!({
            "id": "L1",
            "adminName": "Root",
            "adminId": "A1",
            "action": "Deleted user",
            "target": "U9",
            "timestamp": "2025-03-08 10:00",
            "ipAddress": "10.0.0.1",
            "status": "success"
        }))];
        let artifact = export_report(
            &DataExporter::default(),
            ReportKind::AdminLogs,
            &logs,
            ExportFormat::Csv,
            now(),
        )
        .unwrap();
        assert_eq!(artifact.file_name, "admin_logs_2025-03-09.csv");
        let text = String::from_utf8(artifact.bytes).unwrap();
        let mut lines = text.split("\r\n");
        assert_eq!(
            lines.next(),
            Some("ID,Admin,Action,Target,Timestamp,IP Address,Status")
        );
        assert_eq!(
            lines.next(),
            Some("L1,Root,Deleted user,U9,2025-03-08 10:00,10.0.0.1,success")
        );
    }

    #[test]
    fn test_questionnaire_pdf_has_title() {
        let responses = vec![record(json!({
            "id": "R1", "userName": "Ana", "questionnaireName": "PHQ-9",
            "domain": "Mood", "date": "2025-03-01", "status": "completed", "score": 72
        }))];
        let artifact = export_report(
            &DataExporter::default(),
            ReportKind::QuestionnaireResponses,
            &responses,
            ExportFormat::Pdf,
            now(),
        )
        .unwrap();
        assert_eq!(artifact.file_name, "questionnaire_responses_2025-03-09.pdf");
        let text = String::from_utf8_lossy(&artifact.bytes);
        assert!(text.contains("(Questionnaire Responses Report) Tj"));
        assert!(text.contains("(PHQ-9) Tj"));
        assert!(text.contains("(72) Tj"));
    }

    #[test]
    fn test_analytics_snapshot_from_json() {
        let snapshot: AnalyticsSnapshot = serde_json::from_value(json!({
            "globalUsageStats": {
                "totalUsers": 1250, "activeUsers": 980, "totalSessions": 15420,
                "averageSessionDuration": "24 min", "totalExercisesCompleted": 8750,
                "totalAssessmentsCompleted": 3200, "userGrowth": "+12%", "engagement": "78%"
            }
        }))
        .unwrap();
        assert_eq!(snapshot.global_usage_stats.total_users, 1250);

        let csv = export_analytics(&DataExporter::default(), &snapshot, ExportFormat::Csv, now()).unwrap();
        assert_eq!(csv.file_name, "analytics_report_2025-03-09.csv");
        let text = String::from_utf8(csv.bytes).unwrap();
        assert!(text.starts_with("Metric,Value\r\nTotal Users,1250\r\n"));
        assert!(text.contains("Engagement Rate,78%\r\n"));

        let pdf = export_analytics(&DataExporter::default(), &snapshot, ExportFormat::Pdf, now()).unwrap();
        let text = String::from_utf8_lossy(&pdf.bytes);
        assert!(text.contains("(Global Usage Statistics) Tj"));
        assert!(text.contains("(Average Session Duration) Tj"));
    }
}
