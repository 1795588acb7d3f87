use async_trait::async_trait;
use std::fmt;

/// Price of one tebibyte scanned, in US dollars
pub const PRICE_PER_TIB_USD: f64 = 6.25;
const BYTES_PER_TIB: f64 = 1024.0 * 1024.0 * 1024.0 * 1024.0;

/// Projected cost of a warehouse workflow
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    pub snapshot_bytes: u64,
    pub bytes_per_batch: u64,
    pub batch_count: usize,
}

impl CostEstimate {
    pub fn batch_bytes(&self) -> u64 {
        self.bytes_per_batch.saturating_mul(self.batch_count as u64)
    }

    pub fn total_bytes(&self) -> u64 {
        self.snapshot_bytes.saturating_add(self.batch_bytes())
    }

    pub fn estimated_usd(&self) -> f64 {
        self.total_bytes() as f64 / BYTES_PER_TIB * PRICE_PER_TIB_USD
    }
}

impl fmt::Display for CostEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "snapshot query: {}", format_bytes(self.snapshot_bytes))?;
        writeln!(
            f,
            "batch queries:  {} x {} = {}",
            self.batch_count,
            format_bytes(self.bytes_per_batch),
            format_bytes(self.batch_bytes())
        )?;
        write!(
            f,
            "total:          {} (~${:.2})",
            format_bytes(self.total_bytes()),
            self.estimated_usd()
        )
    }
}

/// Human-readable byte count using binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// CostApprover port: decides whether a metered workflow may spend money
///
/// Implementations that wait on a human must not block the runtime.
#[async_trait]
pub trait CostApprover: Send + Sync {
    /// Returns true only when the estimate is explicitly approved
    async fn approve(&self, estimate: &CostEstimate) -> bool;
}

#[async_trait]
impl<F> CostApprover for F
where
    F: Fn(&CostEstimate) -> bool + Send + Sync,
{
    async fn approve(&self, estimate: &CostEstimate) -> bool {
        self(estimate)
    }
}
