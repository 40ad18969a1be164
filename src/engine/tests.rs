use super::ExportEngine;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::config::ExportConfig;
use crate::lookup::{LookupError, LookupRequest, SecurityLookup};
use crate::models::activity::DataSource;
use crate::models::{ActionKind, ExportError, ResolvedSecurity};
use crate::progress::{ProgressHandle, ProgressReporter};
use crate::types::currency::PENCE_STERLING;

const INVEST_HEADER: &str = "date,type,ticker,symbol,quantity,pricePerShare,totalAmount,currency";

/// Answers from a fixed table and records every key it was asked for.
#[derive(Default)]
struct MockLookup {
    securities: HashMap<String, String>,
    failing_key: Option<String>,
    requests: Mutex<Vec<String>>
}

impl MockLookup {
    fn with_security(mut self, key: &str, symbol: &str) -> Self {
        self.securities.insert(key.to_string(), symbol.to_string());
        self
    }

    fn failing_on(mut self, key: &str) -> Self {
        self.failing_key = Some(key.to_string());
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecurityLookup for MockLookup {
    async fn lookup(&self, request: &LookupRequest, _progress: &dyn ProgressHandle) -> Result<Option<ResolvedSecurity>, LookupError> {
        self.requests.lock().unwrap().push(request.key.clone());

        if self.failing_key.as_deref() == Some(request.key.as_str()) {
            return Err(LookupError::provider("MOCK", "connection reset"));
        }

        Ok(self.securities.get(&request.key).map(|symbol| ResolvedSecurity::new(symbol.clone()).with_currency(request.currency.clone())))
    }
}

#[derive(Default)]
struct ProgressState {
    total: AtomicUsize,
    increments: AtomicUsize,
    stopped: AtomicBool,
    messages: Mutex<Vec<String>>
}

#[derive(Clone, Default)]
struct RecordingProgress {
    state: Arc<ProgressState>
}

impl ProgressReporter for RecordingProgress {
    type Handle = RecordingProgress;

    fn create(&self, total: usize) -> Self::Handle {
        self.state.total.store(total, Ordering::SeqCst);
        self.clone()
    }
}

impl ProgressHandle for RecordingProgress {
    fn increment(&self) {
        self.state.increments.fetch_add(1, Ordering::SeqCst);
    }

    fn log(&self, message: &str) {
        self.state.messages.lock().unwrap().push(message.to_string());
    }

    fn stop(&self) {
        self.state.stopped.store(true, Ordering::SeqCst);
    }
}

fn create_engine(lookup: MockLookup) -> Result<(ExportEngine<MockLookup, RecordingProgress>, Arc<MockLookup>, RecordingProgress)> {
    let lookup = Arc::new(lookup);
    let progress = RecordingProgress::default();
    let engine = ExportEngine::new(ExportConfig::new("account-1")?, lookup.clone(), progress.clone());

    Ok((engine, lookup, progress))
}

fn invest_export(rows: &[&str]) -> String {
    let mut contents = format!("{INVEST_HEADER}\n");

    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }

    contents
}

#[tokio::test]
async fn test_single_buy_is_exported_from_yahoo() -> Result<()> {
    let (engine, lookup, _) = create_engine(MockLookup::default().with_security("AAPL", "AAPL"))?;
    let contents = invest_export(&["2023-01-04T14:30:12.512Z,Buy,AAPL,,2,$125.50,$251,USD"]);

    let export = engine.process_file_contents(&contents).await?;

    assert_eq!(export.meta.version, "v0");
    assert_eq!(export.activities.len(), 1);

    let activity = &export.activities[0];

    assert_eq!(activity.action, ActionKind::Buy);
    assert_eq!(activity.data_source, DataSource::Yahoo);
    assert_eq!(activity.currency, "USD");
    assert_eq!(activity.symbol, "AAPL");
    assert_eq!(activity.account_id, "account-1");
    assert_eq!(activity.quantity, 2.0);
    assert_eq!(activity.unit_price, 125.5);
    assert_eq!(activity.date, "2023-01-04T14:30:12+0000");
    assert_eq!(lookup.requests(), vec!["AAPL"]);

    Ok(())
}

#[tokio::test]
async fn test_gbx_rows_are_exported_in_pence() -> Result<()> {
    let (engine, _, _) = create_engine(MockLookup::default().with_security("VUSA", "VUSA.L"))?;
    let contents = invest_export(&["2023-02-01T08:00:00Z,BUY - MARKET,VUSA,,3,7450,22350,GBX"]);

    let export = engine.process_file_contents(&contents).await?;

    assert_eq!(export.activities[0].currency, PENCE_STERLING);
    assert_eq!(export.activities[0].symbol, "VUSA.L");

    Ok(())
}

#[tokio::test]
async fn test_withdrawals_are_skipped_without_lookup() -> Result<()> {
    let (engine, lookup, progress) = create_engine(MockLookup::default().with_security("AAPL", "AAPL"))?;
    let contents = invest_export(&[
        "2023-01-03T10:00:00Z,WITHDRAWAL,AAPL,,,,$-100,USD",
        "2023-01-03T11:00:00Z,cash withdrawal,,,,,$-50,USD",
        "2023-01-04T14:30:00Z,BUY - MARKET,AAPL,,1,$100,$100,USD",
    ]);

    let export = engine.process_file_contents(&contents).await?;

    assert_eq!(export.activities.len(), 1);
    assert!(export.activities.iter().all(|activity| activity.action == ActionKind::Buy));
    assert_eq!(lookup.requests(), vec!["AAPL"]);
    assert_eq!(progress.state.increments.load(Ordering::SeqCst), 3);

    Ok(())
}

#[tokio::test]
async fn test_ignored_rows_with_unparseable_cells_do_not_abort() -> Result<()> {
    let (engine, lookup, progress) = create_engine(MockLookup::default().with_security("AAPL", "AAPL"))?;
    let contents = invest_export(&[
        "03/01/2023,WITHDRAWAL,,,,,$-100,USD",
        "2023-01-04T14:30:00Z,BUY - MARKET,AAPL,,1,$100,$100,USD",
    ]);

    let export = engine.process_file_contents(&contents).await?;

    assert_eq!(export.activities.len(), 1);
    assert_eq!(export.activities[0].symbol, "AAPL");
    assert_eq!(lookup.requests(), vec!["AAPL"]);
    assert_eq!(progress.state.total.load(Ordering::SeqCst), 2);
    assert_eq!(progress.state.increments.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_crypto_transfer_with_empty_quantity_is_skipped() -> Result<()> {
    let (engine, lookup, progress) = create_engine(MockLookup::default().with_security("BTC-EUR", "BTC-EUR"))?;
    let contents = "\
Symbol,Type,Quantity,Price,Value,Fees,Date
ETH,Send,,,,,02/02/2023 10:00:00
BTC,Buy,0.0025,\"€24,100.50\",€60.25,€0.99,01/02/2023 09:30:00
";

    let export = engine.process_file_contents(contents).await?;

    assert_eq!(export.activities.len(), 1);
    assert_eq!(export.activities[0].action, ActionKind::Buy);
    assert_eq!(export.activities[0].symbol, "BTC-EUR");
    assert_eq!(lookup.requests(), vec!["BTC-EUR"]);
    assert_eq!(progress.state.increments.load(Ordering::SeqCst), 2);
    assert!(progress.state.stopped.load(Ordering::SeqCst));

    Ok(())
}

#[tokio::test]
async fn test_crypto_rewards_are_priced_at_one() -> Result<()> {
    let (engine, _, _) = create_engine(MockLookup::default().with_security("DOT-EUR", "DOT-EUR"))?;
    let contents = "\
Symbol,Type,Quantity,Price,Value,Fees,Date
DOT,Reward,0.5,€6.10,€3.05,,03/02/2023 11:00:00
";

    let export = engine.process_file_contents(contents).await?;

    assert_eq!(export.activities.len(), 1);

    let activity = &export.activities[0];

    assert_eq!(activity.action, ActionKind::Dividend);
    assert_eq!(activity.quantity, 1.0);
    assert_eq!(activity.unit_price, 1.0);
    assert_eq!(activity.currency, "EUR");

    Ok(())
}

#[tokio::test]
async fn test_fee_rows_become_manual_activities() -> Result<()> {
    let (engine, lookup, _) = create_engine(MockLookup::default())?;
    let contents = invest_export(&["2023-03-01T08:00:00Z,CUSTODY FEE,,,,,-$1.99,USD"]);

    let export = engine.process_file_contents(&contents).await?;

    assert_eq!(export.activities.len(), 1);

    let activity = &export.activities[0];

    assert_eq!(activity.action, ActionKind::Fee);
    assert_eq!(activity.quantity, 1.0);
    assert_eq!(activity.unit_price, 0.0);
    assert_eq!(activity.fee, 1.99);
    assert_eq!(activity.data_source, DataSource::Manual);
    assert_eq!(activity.symbol, "Revolut CUSTODY FEE");
    assert!(lookup.requests().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unmatched_security_is_skipped_and_processing_continues() -> Result<()> {
    let (engine, lookup, progress) = create_engine(MockLookup::default().with_security("MSFT", "MSFT"))?;
    let contents = invest_export(&[
        "2023-01-04T14:30:00Z,BUY - MARKET,DELISTED,,1,$10,$10,USD",
        "2023-01-05T14:30:00Z,SELL - MARKET,MSFT,,1,$300,$300,USD",
    ]);

    let export = engine.process_file_contents(&contents).await?;

    assert_eq!(export.activities.len(), 1);
    assert_eq!(export.activities[0].symbol, "MSFT");
    assert_eq!(export.activities[0].action, ActionKind::Sell);
    assert_eq!(lookup.requests(), vec!["DELISTED", "MSFT"]);

    let messages = progress.state.messages.lock().unwrap().clone();

    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("DELISTED"));

    Ok(())
}

#[tokio::test]
async fn test_unrecognised_types_are_skipped_without_lookup() -> Result<()> {
    let (engine, lookup, progress) = create_engine(MockLookup::default().with_security("AAPL", "AAPL"))?;
    let contents = invest_export(&[
        "2023-01-04T14:30:00Z,CASH INTEREST,AAPL,,,,$0.12,USD",
        "2023-01-05T14:30:00Z,DIVIDEND,AAPL,,,,$0.88,USD",
    ]);

    let export = engine.process_file_contents(&contents).await?;

    assert_eq!(export.activities.len(), 1);
    assert_eq!(export.activities[0].action, ActionKind::Dividend);
    assert_eq!(export.activities[0].quantity, 1.0);
    assert_eq!(export.activities[0].unit_price, 0.88);
    assert_eq!(lookup.requests(), vec!["AAPL"]);
    assert_eq!(progress.state.messages.lock().unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_lookup_failure_aborts_the_whole_run() -> Result<()> {
    let lookup = MockLookup::default()
        .with_security("AAPL", "AAPL")
        .with_security("MSFT", "MSFT")
        .failing_on("TSLA");
    let (engine, lookup, progress) = create_engine(lookup)?;
    let contents = invest_export(&[
        "2023-01-04T14:30:00Z,BUY - MARKET,AAPL,,1,$100,$100,USD",
        "2023-01-05T14:30:00Z,BUY - MARKET,TSLA,,1,$200,$200,USD",
        "2023-01-06T14:30:00Z,BUY - MARKET,MSFT,,1,$300,$300,USD",
    ]);

    let result = engine.process_file_contents(&contents).await;

    let (row, key) = match result {
        Err(ExportError::Lookup { row, key, .. }) => (row, key),
        other => return Err(anyhow!("Expected a lookup failure, got {other:?}"))
    };

    assert_eq!(row, 1);
    assert_eq!(key, "TSLA");
    assert_eq!(lookup.requests(), vec!["AAPL", "TSLA"]);
    assert!(progress.state.stopped.load(Ordering::SeqCst));
    assert_eq!(progress.state.increments.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_empty_exports_are_rejected() -> Result<()> {
    let (engine, lookup, _) = create_engine(MockLookup::default())?;

    assert!(matches!(engine.process_file_contents("").await, Err(ExportError::EmptyInput)));
    assert!(matches!(engine.process_file_contents(&invest_export(&[])).await, Err(ExportError::EmptyInput)));
    assert!(lookup.requests().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_malformed_rows_are_rejected_before_any_lookup() -> Result<()> {
    let (engine, lookup, _) = create_engine(MockLookup::default().with_security("AAPL", "AAPL"))?;
    let contents = invest_export(&[
        "2023-01-04T14:30:00Z,BUY - MARKET,AAPL,,1,$100,$100,USD",
        "2023-01-05T14:30:00Z,BUY - MARKET,AAPL,,lots,$100,$100,USD",
    ]);

    let result = engine.process_file_contents(&contents).await;

    assert!(matches!(result, Err(ExportError::InvalidField { line: 3, column: "quantity", .. })));
    assert!(lookup.requests().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_crypto_export_uses_symbol_currency_keys() -> Result<()> {
    let (engine, lookup, progress) = create_engine(MockLookup::default().with_security("BTC-EUR", "BTC-EUR"))?;
    let contents = "\
Symbol,Type,Quantity,Price,Value,Fees,Date
BTC,Buy,0.0025,\"€24,100.50\",€60.25,€0.99,01/02/2023 09:30:00
ETH,Receive,0.5,\"€1,500.00\",€750.00,,02/02/2023 10:00:00
";

    let export = engine.process_file_contents(contents).await?;

    assert_eq!(export.activities.len(), 1);

    let activity = &export.activities[0];

    assert_eq!(activity.action, ActionKind::Buy);
    assert_eq!(activity.symbol, "BTC-EUR");
    assert_eq!(activity.currency, "EUR");
    assert_eq!(activity.quantity, 0.0025);
    assert_eq!(activity.unit_price, 24100.5);
    assert_eq!(activity.fee, 0.99);
    assert_eq!(lookup.requests(), vec!["BTC-EUR"]);
    assert_eq!(progress.state.total.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn test_activities_keep_input_order() -> Result<()> {
    let lookup = MockLookup::default()
        .with_security("AAPL", "AAPL")
        .with_security("MSFT", "MSFT");
    let (engine, _, _) = create_engine(lookup)?;
    let contents = invest_export(&[
        "2023-01-06T14:30:00Z,SELL - MARKET,MSFT,,1,$300,$300,USD",
        "2023-01-05T14:30:00Z,CUSTODY FEE,,,,,-$1,USD",
        "2023-01-04T14:30:00Z,BUY - MARKET,AAPL,,1,$100,$100,USD",
    ]);

    let export = engine.process_file_contents(&contents).await?;
    let symbols: Vec<&str> = export.activities.iter().map(|activity| activity.symbol.as_str()).collect();

    assert_eq!(symbols, vec!["MSFT", "Revolut CUSTODY FEE", "AAPL"]);

    Ok(())
}
