//! Data layer: schema validation, CSV ingestion and pass-through export.

pub mod export;
pub mod ingest;
pub mod schema;

pub use export::{default_export_name, export_to_path, write_csv, ExportError};
pub use ingest::{Dataset, FieldIssues, IngestError};
pub use schema::{required_columns, validate_header, Column, ColumnMap, SchemaError};
