use crate::ports::outbound::Warehouse;
use crate::shared::error::AnalyzerError;
use crate::shared::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

/// `bq` returns only 100 rows unless told otherwise
const MAX_ROWS: u64 = 1_000_000;

/// BigQueryCli adapter: drives the `bq` command-line client
///
/// Every query runs in standard SQL. Authentication and billing project
/// come from the local gcloud setup unless a project id is configured.
pub struct BigQueryCli {
    binary: String,
    project_id: Option<String>,
}

impl BigQueryCli {
    pub fn new(binary: impl Into<String>, project_id: Option<String>) -> Self {
        Self {
            binary: binary.into(),
            project_id,
        }
    }

    async fn run(&self, subcommand: &str, args: &[String]) -> Result<String> {
        let mut command = Command::new(&self.binary);
        command.arg("--quiet");
        if let Some(project) = &self.project_id {
            command.arg(format!("--project_id={}", project));
        }
        command.arg(subcommand).args(args);

        let output = command.output().await.map_err(|e| AnalyzerError::WarehouseCommand {
            command: subcommand.to_string(),
            status: "not started".to_string(),
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(AnalyzerError::WarehouseCommand {
                command: subcommand.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Extracts the scanned-bytes estimate from dry-run output.
    ///
    /// Accepts the JSON job resource (`--format=json`) and the plain-text
    /// "will process N bytes" message.
    pub fn parse_dry_run_bytes(stdout: &str) -> Option<u64> {
        if let Ok(job) = serde_json::from_str::<Value>(stdout.trim()) {
            let statistics = job.get("statistics")?;
            let bytes = statistics
                .get("totalBytesProcessed")
                .or_else(|| statistics.get("query")?.get("totalBytesProcessed"))?;
            return match bytes {
                Value::String(text) => text.parse().ok(),
                Value::Number(number) => number.as_u64(),
                _ => None,
            };
        }

        let words: Vec<&str> = stdout.split_whitespace().collect();
        words
            .windows(2)
            .find(|pair| pair[1].trim_end_matches('.') == "bytes")
            .and_then(|pair| pair[0].replace(',', "").parse().ok())
    }

    /// Parses `--format=json` query output; blank output means no rows
    pub fn parse_rows(stdout: &str) -> std::result::Result<Vec<Value>, serde_json::Error> {
        let trimmed = stdout.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(trimmed)
    }
}

impl Default for BigQueryCli {
    fn default() -> Self {
        Self::new("bq", None)
    }
}

#[async_trait]
impl Warehouse for BigQueryCli {
    async fn version(&self) -> Result<String> {
        let stdout = self.run("version", &[]).await?;
        Ok(stdout.trim().to_string())
    }

    async fn dry_run(&self, sql: &str) -> Result<u64> {
        let args = vec![
            "--use_legacy_sql=false".to_string(),
            "--dry_run".to_string(),
            "--format=json".to_string(),
            sql.to_string(),
        ];
        let stdout = self.run("query", &args).await?;
        Self::parse_dry_run_bytes(&stdout).ok_or_else(|| {
            AnalyzerError::WarehouseOutput {
                command: "query --dry_run".to_string(),
                details: format!("no byte estimate in output: {}", stdout.trim()),
            }
            .into()
        })
    }

    async fn query(&self, sql: &str, maximum_bytes_billed: u64) -> Result<Vec<Value>> {
        let args = vec![
            "--use_legacy_sql=false".to_string(),
            "--format=json".to_string(),
            format!("--max_rows={}", MAX_ROWS),
            format!("--maximum_bytes_billed={}", maximum_bytes_billed),
            sql.to_string(),
        ];
        let stdout = self.run("query", &args).await?;
        Self::parse_rows(&stdout).map_err(|e| {
            AnalyzerError::WarehouseOutput {
                command: "query".to_string(),
                details: e.to_string(),
            }
            .into()
        })
    }
}
