use crate::analysis::domain::{ScoredPackage, ScoredTargetRepo};

/// Min-max normalization of `log10(x + 1)` over one batch of raw signals
#[derive(Debug, Clone, Copy)]
pub struct LogMinMax {
    min: f64,
    max: f64,
}

impl LogMinMax {
    pub fn fit(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .map(log_scale)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min.is_finite() && max.is_finite() {
            Self { min, max }
        } else {
            Self { min: 0.0, max: 0.0 }
        }
    }

    /// Maps `raw` into [0, 1]. A batch without spread gives 1.0 to positive
    /// values and 0.0 to zeros.
    pub fn normalize(&self, raw: f64) -> f64 {
        let value = log_scale(raw);
        let range = self.max - self.min;
        if range <= f64::EPSILON {
            return if value > 0.0 { 1.0 } else { 0.0 };
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }
}

fn log_scale(raw: f64) -> f64 {
    (raw.max(0.0) + 1.0).log10()
}

/// Anything that takes part in a descending composite-score ranking
pub trait Rankable {
    fn composite_score(&self) -> f64;
    /// Secondary key that keeps the order deterministic on equal scores
    fn tie_breaker(&self) -> &str;
    fn set_position(&mut self, rank: usize, percentile: f64);
}

impl Rankable for ScoredPackage {
    fn composite_score(&self) -> f64 {
        self.composite_score
    }

    fn tie_breaker(&self) -> &str {
        self.name()
    }

    fn set_position(&mut self, rank: usize, percentile: f64) {
        self.rank = rank;
        self.percentile = percentile;
    }
}

impl Rankable for ScoredTargetRepo {
    fn composite_score(&self) -> f64 {
        self.composite_score
    }

    fn tie_breaker(&self) -> &str {
        &self.repo.full_name
    }

    fn set_position(&mut self, rank: usize, percentile: f64) {
        self.rank = rank;
        self.percentile = percentile;
    }
}

/// Sorts descending by composite score and assigns rank `1..=N` and
/// percentile `100 x (N - index) / N`, so the top item always gets 100.
pub fn sort_and_rank<T: Rankable>(items: &mut [T]) {
    items.sort_by(|a, b| {
        b.composite_score()
            .total_cmp(&a.composite_score())
            .then_with(|| a.tie_breaker().cmp(b.tie_breaker()))
    });

    let total = items.len();
    for (index, item) in items.iter_mut().enumerate() {
        let percentile = 100.0 * (total - index) as f64 / total as f64;
        item.set_position(index + 1, percentile);
    }
}
