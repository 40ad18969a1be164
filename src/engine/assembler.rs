use tracing::{debug, error};

use crate::config::ExportConfig;
use crate::lookup::{SecurityLookup, SecurityResolver};
use crate::models::{ActionKind, ExportActivity, ExportError, ExportResult, NormalizedRow, ParsedRow};
use crate::progress::ProgressHandle;

/// Walks the rows of one run in order and collects their activities.
///
/// The activity list only leaves the assembler through [`ExportAssembler::run`], and only
/// when every row was processed.
pub struct ExportAssembler<'a, L: SecurityLookup, H: ProgressHandle> {
    config: &'a ExportConfig,
    resolver: &'a SecurityResolver<L>,
    progress: H,
    activities: Vec<ExportActivity>
}

impl<'a, L: SecurityLookup, H: ProgressHandle> ExportAssembler<'a, L, H> {
    pub fn new(config: &'a ExportConfig, resolver: &'a SecurityResolver<L>, progress: H) -> Self {
        Self {
            config,
            resolver,
            progress,
            activities: Vec::new()
        }
    }

    pub async fn run(mut self, rows: Vec<ParsedRow>) -> Result<ExportResult, ExportError> {
        let outcome = self.process_rows(rows).await;
        self.progress.stop();

        outcome.map(|_| ExportResult::new(self.activities))
    }

    async fn process_rows(&mut self, rows: Vec<ParsedRow>) -> Result<(), ExportError> {
        for (index, row) in rows.iter().enumerate() {
            let result = match row {
                ParsedRow::Ignored { line, label } => {
                    debug!("Ignoring row [{index}] on line [{line}] of type [{label}]");
                    Ok(())
                }
                ParsedRow::Normalized(row) => self.process_row(index, row).await
            };
            self.progress.increment();
            result?;
        }

        Ok(())
    }

    async fn process_row(&mut self, index: usize, row: &NormalizedRow) -> Result<(), ExportError> {
        let Some(action) = row.action else {
            self.progress.log(&format!("Row [{index}] on line [{}] has an unrecognised type [{}] and was skipped", row.line, row.label));
            return Ok(());
        };

        if action == ActionKind::Fee {
            self.activities.push(ExportActivity::fee(&self.config.account_id, &self.config.broker, row));
            return Ok(());
        }

        let request = SecurityResolver::<L>::request_for(row);

        let security = match self.resolver.resolve(&request, &self.progress).await {
            Ok(Some(security)) => security,
            Ok(None) => return Ok(()),
            Err(source) => {
                error!("Security lookup failed on row [{index}] (line [{}]) for [{}]: {source}", row.line, request.key);
                return Err(ExportError::lookup(index, &request.key, source));
            }
        };

        if let Some(value) = row.value {
            debug!("Row [{index}] on line [{}] is worth [{value}] {}", row.line, row.currency);
        }

        self.activities.push(ExportActivity::trade(&self.config.account_id, row, action, &security));

        Ok(())
    }
}
