//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::endpoints::list_builtin_info;
use crate::error::{Error, Result};
use crate::history::{Adjust, HistoryRequest, Period};
use crate::loader::{load_definition, Definition, HistoryDefinition, SnapshotDefinition};
use crate::output::{passthrough, project, today_path, ColumnSpec, CsvWriter, Frame};
use crate::types::Record;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spot {
                endpoint,
                output_dir,
                output,
                concurrency,
                timeout,
            } => {
                let destination = output.clone().unwrap_or_else(|| today_path(output_dir));
                self.spot(endpoint, &destination, *concurrency, *timeout)
                    .await
            }
            Commands::History {
                symbol,
                period,
                adjust,
                start,
                end,
                endpoint,
                output,
                timeout,
            } => {
                let request = Self::history_request(symbol, *period, *adjust, *start, *end);
                self.history(endpoint, &request, output.as_deref(), *timeout)
                    .await
            }
            Commands::List => self.list_endpoints(),
            Commands::Validate { endpoint } => self.validate(endpoint),
        }
    }

    /// Fetch, rank and write a snapshot
    async fn spot(
        &self,
        endpoint: &Path,
        destination: &Path,
        concurrency: Option<usize>,
        timeout: Option<u64>,
    ) -> Result<()> {
        let def = Self::load_snapshot(endpoint)?;
        let timeout = Self::timeout_override(timeout)?.unwrap_or_else(|| def.fetch.timeout());
        let concurrency = match concurrency {
            Some(0) => return Err(Error::invalid_value("concurrency", "must be at least 1")),
            Some(n) => n,
            None => def.fetch.concurrency,
        };

        let start = Instant::now();
        tracing::info!(
            endpoint = %def.metadata.name,
            concurrency,
            timeout_ms = timeout.as_millis() as u64,
            "Fetching snapshot"
        );

        let engine = def.engine()?;
        let table = engine
            .fetch_paginated(def.base_query(), timeout, concurrency)
            .await?;
        let frame = Frame::from_table(&table, &def.columns);

        self.emit(&frame, Some(destination))?;

        tracing::info!(
            rows = frame.len(),
            pages = table.stats().pages_fetched,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Snapshot complete"
        );
        Ok(())
    }

    /// Fetch and write klines for one symbol
    async fn history(
        &self,
        endpoint: &Path,
        request: &HistoryRequest,
        output: Option<&Path>,
        timeout: Option<u64>,
    ) -> Result<()> {
        let def = Self::load_history(endpoint)?;
        let timeout = Self::timeout_override(timeout)?.unwrap_or_else(|| def.fetch.timeout());

        let records = def.fetcher()?.fetch(request, timeout).await?;
        let frame = Self::frame(&records, &def.columns);
        self.emit(&frame, output)
    }

    /// List built-in endpoints
    fn list_endpoints(&self) -> Result<()> {
        let rows: Vec<Record> = list_builtin_info()
            .into_iter()
            .map(|info| {
                let mut row = Record::new();
                row.insert("name".into(), info.name.into());
                row.insert("kind".into(), info.kind.into());
                row.insert("aliases".into(), info.aliases.join(" ").into());
                row.insert("description".into(), info.description.into());
                row
            })
            .collect();

        let columns = ["name", "kind", "aliases", "description"]
            .map(|c| ColumnSpec::text(c, c));
        self.emit(&project(&rows, &columns), None)
    }

    /// Validate an endpoint definition
    fn validate(&self, endpoint: &Path) -> Result<()> {
        let def = load_definition(endpoint)?;
        let message = format!(
            "Endpoint '{}' ({}) is valid with {} columns",
            def.name(),
            def.kind(),
            def.columns().len()
        );

        match self.cli.format {
            OutputFormat::Csv => println!("{message}"),
            OutputFormat::Json | OutputFormat::Pretty => self.output_message(&json!({
                "type": "VALIDATION",
                "endpoint": def.name(),
                "kind": def.kind(),
                "valid": true,
                "message": message,
            })),
        }
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn load_snapshot(endpoint: &Path) -> Result<SnapshotDefinition> {
        match load_definition(endpoint)? {
            Definition::Snapshot(def) => Ok(def),
            Definition::History(def) => Err(Error::config(format!(
                "Endpoint '{}' is a history endpoint; use the `history` command",
                def.metadata.name
            ))),
        }
    }

    fn load_history(endpoint: &Path) -> Result<HistoryDefinition> {
        match load_definition(endpoint)? {
            Definition::History(def) => Ok(def),
            Definition::Snapshot(def) => Err(Error::config(format!(
                "Endpoint '{}' is a snapshot endpoint; use the `spot` command",
                def.metadata.name
            ))),
        }
    }

    fn timeout_override(secs: Option<u64>) -> Result<Option<Duration>> {
        match secs {
            Some(0) => Err(Error::invalid_value("timeout", "must be greater than 0")),
            Some(s) => Ok(Some(Duration::from_secs(s))),
            None => Ok(None),
        }
    }

    fn history_request(
        symbol: &str,
        period: Period,
        adjust: Adjust,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> HistoryRequest {
        let request = HistoryRequest::new(symbol)
            .with_period(period)
            .with_adjust(adjust);
        let start = start.unwrap_or(request.start);
        let end = end.unwrap_or(request.end);
        request.with_range(start, end)
    }

    fn frame(records: &[Record], columns: &[ColumnSpec]) -> Frame {
        if columns.is_empty() {
            passthrough(records, None)
        } else {
            project(records, columns)
        }
    }

    /// Write `frame` in the selected format, to `path` for CSV or stdout otherwise
    fn emit(&self, frame: &Frame, path: Option<&Path>) -> Result<()> {
        match self.cli.format {
            OutputFormat::Csv => {
                let writer = CsvWriter::new();
                match path {
                    Some(path) => {
                        writer.write_path(frame, path)?;
                        println!("{}", path.display());
                    }
                    None => writer.write_to(frame, std::io::stdout().lock())?,
                }
            }
            OutputFormat::Json => {
                let mut out = std::io::stdout().lock();
                for row in frame.to_json_rows() {
                    serde_json::to_writer(&mut out, &row)?;
                    writeln!(out)?;
                }
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(&frame.to_json_rows())?);
            }
        }
        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
            OutputFormat::Json | OutputFormat::Csv => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
        }
    }
}
