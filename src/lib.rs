pub mod config;
pub mod data;
pub mod export;
pub mod logging;
pub mod page;
pub mod table_display;

pub use config::Config;
pub use data::column::{CellRenderer, ColumnDescriptor};
pub use data::data_provider::{DataProvider, StaticDataProvider};
pub use data::data_view::{RenderedPage, SortDirection, SortState, TableView, ViewSnapshot};
pub use data::record::{FieldValue, Record};
pub use export::artifact::{DirectorySink, DownloadSink, ExportArtifact, ExportFormat};
pub use export::controller::{ExportController, ExportNotice};
pub use export::data_exporter::DataExporter;
pub use export::ExportColumn;
pub use page::ReportPage;
