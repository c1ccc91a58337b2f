//! Report pages: a dataset, its filters, a table view and an export button
//! wired together the way the admin dashboard screens are.

use anyhow::Context;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::data::column::ColumnDescriptor;
use crate::data::data_provider::DataProvider;
use crate::data::data_view::{RenderedPage, TableView};
use crate::data::filter::{apply_filter, FieldFilter, FilterRule, FilterValues};
use crate::data::record::{FieldValue, Record};
use crate::export::artifact::{DownloadSink, ExportFormat};
use crate::export::controller::{ExportController, ExportNotice};
use crate::export::data_exporter::DataExporter;
use crate::export::reports::{export_report, ReportKind};

pub const USERS_DATASET: &str = "users";
pub const QUESTIONNAIRES_DATASET: &str = "questionnaireResponses";
pub const ADMIN_LOGS_DATASET: &str = "adminLogs";

const ADMIN_LOGS_PAGE_SIZE: usize = 15;

pub struct ReportPage {
    kind: ReportKind,
    source: Arc<Vec<Record>>,
    filter: FieldFilter,
    filter_values: FilterValues,
    view: TableView,
    controller: ExportController,
    exporter: DataExporter,
}

impl ReportPage {
    pub fn new(
        kind: ReportKind,
        source: Arc<Vec<Record>>,
        columns: Vec<ColumnDescriptor>,
        filter: FieldFilter,
        config: &Config,
    ) -> Self {
        let view = TableView::new(Arc::clone(&source), columns)
            .with_page_size(config.table.page_size)
            .with_placeholder(config.table.placeholder.clone());
        Self {
            kind,
            source,
            filter,
            filter_values: FilterValues::new(),
            view,
            controller: ExportController::new(),
            exporter: config.exporter(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.view.set_page_size(page_size);
        self
    }

    fn dataset(provider: &dyn DataProvider, name: &str) -> Arc<Vec<Record>> {
        provider.dataset(name).unwrap_or_else(|| {
            warn!("Dataset '{}' not found; showing an empty table", name);
            Arc::new(Vec::new())
        })
    }

    /// User management screen
    pub fn users(provider: &dyn DataProvider, config: &Config) -> Self {
        let columns = vec![
            ColumnDescriptor::new("id", "User ID"),
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("email", "Email"),
            ColumnDescriptor::new("phone", "Phone").with_sortable(false),
            ColumnDescriptor::new("registrationDate", "Registration Date"),
            ColumnDescriptor::new("status", "Status"),
        ];
        let filter = FieldFilter::new(vec![
            FilterRule::search("search", &["name", "email", "id"]),
            FilterRule::equals("status", "status"),
        ]);
        Self::new(
            ReportKind::Users,
            Self::dataset(provider, USERS_DATASET),
            columns,
            filter,
            config,
        )
    }

    /// Questionnaire responses screen
    pub fn questionnaires(provider: &dyn DataProvider, config: &Config) -> Self {
        let columns = vec![
            ColumnDescriptor::new("id", "ID"),
            ColumnDescriptor::new("userName", "User"),
            ColumnDescriptor::new("questionnaireName", "Questionnaire"),
            ColumnDescriptor::new("domain", "Domain"),
            ColumnDescriptor::new("date", "Date"),
            ColumnDescriptor::new("status", "Status"),
            ColumnDescriptor::new("score", "Score").with_render(|value, _| match value {
                None | Some(FieldValue::Null) => String::new(),
                Some(score) => format!("{}%", score),
            }),
        ];
        let filter = FieldFilter::new(vec![
            FilterRule::search("search", &["userName", "questionnaireName"]),
            FilterRule::equals("domain", "domain"),
            FilterRule::equals("status", "status"),
            FilterRule::date_from("dateFrom", "date"),
            FilterRule::date_to("dateTo", "date"),
        ]);
        Self::new(
            ReportKind::QuestionnaireResponses,
            Self::dataset(provider, QUESTIONNAIRES_DATASET),
            columns,
            filter,
            config,
        )
    }

    /// Admin activity log screen
    pub fn admin_logs(provider: &dyn DataProvider, config: &Config) -> Self {
        let columns = vec![
            ColumnDescriptor::new("timestamp", "Timestamp"),
            ColumnDescriptor::new("adminName", "Admin").with_render(|value, record| {
                let name = value.map(ToString::to_string).unwrap_or_default();
                match record.get("adminId") {
                    Some(id) if !id.is_null() => format!("{} ({})", name, id),
                    _ => name,
                }
            }),
            ColumnDescriptor::new("action", "Action"),
            ColumnDescriptor::new("target", "Target"),
            ColumnDescriptor::new("ipAddress", "IP Address").with_sortable(false),
            ColumnDescriptor::new("status", "Status"),
        ];
        let filter = FieldFilter::new(vec![
            FilterRule::search("search", &["adminName", "action", "target"]),
            FilterRule::contains("status", "status"),
            FilterRule::date_from("dateFrom", "timestamp"),
        ]);
        Self::new(
            ReportKind::AdminLogs,
            Self::dataset(provider, ADMIN_LOGS_DATASET),
            columns,
            filter,
            config,
        )
        .with_page_size(ADMIN_LOGS_PAGE_SIZE)
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TableView {
        &mut self.view
    }

    pub fn controller(&self) -> &ExportController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ExportController {
        &mut self.controller
    }

    pub fn filter_values(&self) -> &FilterValues {
        &self.filter_values
    }

    /// Number of records passing the current filters
    pub fn filtered_count(&self) -> usize {
        self.view.total_rows()
    }

    pub fn set_filter(&mut self, name: &str, value: &str) {
        self.filter_values.set(name, value);
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.filter_values.clear();
        self.refilter();
    }

    fn refilter(&mut self) {
        let filtered = if self.filter_values.is_active() {
            Arc::new(apply_filter(&self.source, &self.filter, &self.filter_values))
        } else {
            Arc::clone(&self.source)
        };
        debug!(
            "{} filter kept {} of {} records",
            self.kind,
            filtered.len(),
            self.source.len()
        );
        self.view.set_data(filtered);
    }

    pub fn render(&self) -> RenderedPage {
        self.view.render_page()
    }

    /// Export every filtered record in the current sort order and hand the
    /// file to `sink`. Pagination does not limit the export.
    pub fn export(
        &mut self,
        format: ExportFormat,
        sink: &mut dyn DownloadSink,
        now: DateTime<Local>,
    ) -> ExportNotice {
        let records: Vec<&Record> = self.view.sorted_records().collect();
        let kind = self.kind;
        let exporter = &self.exporter;
        self.controller.run(format, |format| {
            let artifact = export_report(exporter, kind, records, format, now)?;
            sink.deliver(&artifact)
                .with_context(|| format!("Failed to save {}", artifact.file_name))?;
            Ok(artifact.file_name)
        })
    }
}
