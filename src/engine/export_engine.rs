use std::sync::Arc;

use tracing::{error, info};

use crate::config::ExportConfig;
use crate::engine::ExportAssembler;
use crate::lookup::{SecurityLookup, SecurityResolver};
use crate::models::{ExportError, ExportResult, Schema};
use crate::parser::parse_rows;
use crate::progress::ProgressReporter;

/// Converts Revolut exports into Ghostfolio activity exports.
pub struct ExportEngine<L: SecurityLookup, P: ProgressReporter> {
    config: ExportConfig,
    resolver: SecurityResolver<L>,
    progress: P
}

impl<L: SecurityLookup, P: ProgressReporter> ExportEngine<L, P> {
    pub fn new(config: ExportConfig, lookup: Arc<L>, progress: P) -> Self {
        Self {
            config,
            resolver: SecurityResolver::new(lookup),
            progress
        }
    }

    /// Runs the whole pipeline over the raw contents of an export file.
    ///
    /// Rows are processed strictly in order, awaiting each lookup before moving on.
    ///
    /// # Errors
    /// Returns `ExportError` if:
    /// - The file cannot be tokenized or a cell cannot be coerced.
    /// - The file has no data rows.
    /// - The lookup service fails for any row. Rows after it are not processed.
    pub async fn process_file_contents(&self, contents: &str) -> Result<ExportResult, ExportError> {
        let schema = Schema::detect(contents);
        info!("Detected {schema:?} export");

        let rows = parse_rows(contents, schema).inspect_err(|error| {
            error!("Export parsing failed: {error}");
        })?;

        if rows.is_empty() {
            error!("Export contains no transactions");
            return Err(ExportError::EmptyInput);
        }

        let assembler = ExportAssembler::new(&self.config, &self.resolver, self.progress.create(rows.len()));
        let export = assembler.run(rows).await?;

        info!("Exported [{}] activities", export.activities.len());

        Ok(export)
    }
}
