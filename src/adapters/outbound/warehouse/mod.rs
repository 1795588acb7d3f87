/// Warehouse adapters
mod bigquery_cli;

pub use bigquery_cli::BigQueryCli;
