use crate::ports::outbound::{CostApprover, CostEstimate};
use async_trait::async_trait;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, IsTerminal, Write};

/// Prompts on the terminal before a metered query may run.
///
/// Refuses without asking when stdin is not a terminal, so unattended runs
/// never spend money unless `--yes` was given.
pub struct InteractiveCostApprover;

impl InteractiveCostApprover {
    pub fn new() -> Self {
        Self
    }

    /// The plain estimate, indented under a bold title, total highlighted
    fn render(estimate: &CostEstimate) -> String {
        let plain = estimate.to_string();
        let mut lines = vec!["💰 Warehouse cost estimate".bold().to_string()];
        let stages: Vec<&str> = plain.lines().collect();
        if let Some((total, rest)) = stages.split_last() {
            lines.extend(rest.iter().map(|line| format!("   {}", line)));
            lines.push(format!("   {}", total.yellow().bold()));
        }
        lines.join("\n")
    }

    fn read_answer() -> bool {
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => Self::is_yes(&answer),
            Err(_) => false,
        }
    }

    fn is_yes(answer: &str) -> bool {
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

impl Default for InteractiveCostApprover {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CostApprover for InteractiveCostApprover {
    async fn approve(&self, estimate: &CostEstimate) -> bool {
        eprintln!("{}", Self::render(estimate));

        if !io::stdin().is_terminal() {
            eprintln!(
                "{}",
                "⚠️  stdin is not a terminal; declining. Pass --yes to approve non-interactively."
                    .yellow()
            );
            return false;
        }

        eprint!("   Run these queries? [y/N] ");
        if io::stderr().flush().is_err() {
            return false;
        }
        // the prompt blocks on stdin, so it runs off the async workers
        tokio::task::spawn_blocking(Self::read_answer)
            .await
            .unwrap_or(false)
    }
}

/// Approves every estimate after printing it (`--yes`)
pub struct AutoApprover;

#[async_trait]
impl CostApprover for AutoApprover {
    async fn approve(&self, estimate: &CostEstimate) -> bool {
        eprintln!("{}", InteractiveCostApprover::render(estimate));
        eprintln!("   {}", "Approved by --yes".green());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate() -> CostEstimate {
        CostEstimate {
            snapshot_bytes: 2048,
            bytes_per_batch: 1024,
            batch_count: 3,
        }
    }

    #[test]
    fn test_answers() {
        assert!(InteractiveCostApprover::is_yes("y\n"));
        assert!(InteractiveCostApprover::is_yes(" YES "));
        assert!(!InteractiveCostApprover::is_yes("\n"));
        assert!(!InteractiveCostApprover::is_yes("no"));
    }

    #[test]
    fn test_render_mentions_every_stage() {
        let text = InteractiveCostApprover::render(&estimate());
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("snapshot query: 2.00 KiB"));
        assert!(text.contains("3 x 1.00 KiB"));
        assert!(text.contains("5.00 KiB"));
    }

    #[tokio::test]
    async fn test_auto_approver() {
        assert!(AutoApprover.approve(&estimate()).await);
    }
}
