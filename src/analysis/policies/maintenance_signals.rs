use crate::analysis::domain::{PackageStatus, RepoHealth};

/// Below this many closed external PRs the observed merge ratio is ignored
const MIN_CLOSED_PRS_FOR_RATIO: u32 = 5;
/// Merge ratio assumed for repositories with too little PR history
const NEUTRAL_MERGE_PRIOR: f64 = 0.4;
/// Contributor count at which the contributor term saturates
const CONTRIBUTOR_SATURATION: f64 = 20.0;

const COMMIT_MIDPOINT_DAYS: f64 = 180.0;
const COMMIT_WIDTH_DAYS: f64 = 60.0;
const RELEASE_MIDPOINT_DAYS: f64 = 365.0;
const RELEASE_WIDTH_DAYS: f64 = 120.0;

const WEIGHT_COMMIT: f64 = 0.35;
const WEIGHT_RELEASE: f64 = 0.15;
const WEIGHT_MERGE_RATIO: f64 = 0.35;
const WEIGHT_CONTRIBUTORS: f64 = 0.15;

const CONTRIBUTING_GUIDE_BONUS: f64 = 1.1;

/// Decreasing logistic curve: 1 for fresh activity, 0.5 at `midpoint`, towards 0 after
pub fn recency_sigmoid(days: f64, midpoint: f64, width: f64) -> f64 {
    1.0 / (1.0 + ((days - midpoint) / width).exp())
}

/// MaintenanceSignals turns repository health into the probability that an
/// external PR gets merged, and into liveness/status classifications.
pub struct MaintenanceSignals;

impl MaintenanceSignals {
    /// Probability that a well-formed external PR would be merged.
    ///
    /// Exactly 0.0 for archived repositories; otherwise clamped to
    /// [0.01, 0.99].
    pub fn merge_probability(health: &RepoHealth) -> f64 {
        if health.archived {
            return 0.0;
        }

        let commit_term = health
            .days_since_last_commit
            .map(|d| recency_sigmoid(d as f64, COMMIT_MIDPOINT_DAYS, COMMIT_WIDTH_DAYS))
            .unwrap_or(0.5);
        let release_term = health
            .days_since_last_release
            .map(|d| recency_sigmoid(d as f64, RELEASE_MIDPOINT_DAYS, RELEASE_WIDTH_DAYS))
            .unwrap_or(0.5);

        let merge_ratio = if health.external_prs_closed < MIN_CLOSED_PRS_FOR_RATIO {
            NEUTRAL_MERGE_PRIOR
        } else {
            f64::from(health.external_prs_merged) / f64::from(health.external_prs_closed)
        };

        let contributor_term = ((1.0 + f64::from(health.contributor_count_recent)).ln()
            / (1.0 + CONTRIBUTOR_SATURATION).ln())
        .min(1.0);

        let mut probability = WEIGHT_COMMIT * commit_term
            + WEIGHT_RELEASE * release_term
            + WEIGHT_MERGE_RATIO * merge_ratio
            + WEIGHT_CONTRIBUTORS * contributor_term;

        if health.has_contributing_guide {
            probability *= CONTRIBUTING_GUIDE_BONUS;
        }

        probability.clamp(0.01, 0.99)
    }

    /// Step penalty for long-inactive repositories; 0.5 when nothing is known
    pub fn liveness_penalty(health: &RepoHealth) -> f64 {
        if health.archived {
            return 0.05;
        }
        match health.days_since_last_commit {
            None => 0.5,
            Some(days) if days > 730 => 0.10,
            Some(days) if days > 365 => 0.30,
            Some(_) => 1.0,
        }
    }

    /// Display status from the same recency signal as the liveness penalty
    pub fn status(health: &RepoHealth) -> PackageStatus {
        if health.archived {
            return PackageStatus::Archived;
        }
        match health.days_since_last_commit {
            None => PackageStatus::Unknown,
            Some(days) if days > 730 => PackageStatus::Dormant,
            Some(days) if days > 365 => PackageStatus::Stale,
            Some(_) => PackageStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health(commit: Option<i64>, release: Option<i64>) -> RepoHealth {
        RepoHealth {
            days_since_last_commit: commit,
            days_since_last_release: release,
            ..RepoHealth::default()
        }
    }

    #[test]
    fn test_sigmoid_midpoint() {
        assert!((recency_sigmoid(180.0, 180.0, 60.0) - 0.5).abs() < 1e-12);
        assert!(recency_sigmoid(0.0, 180.0, 60.0) > 0.95);
        assert!(recency_sigmoid(720.0, 180.0, 60.0) < 0.001);
    }

    #[test]
    fn test_archived_is_exactly_zero() {
        let archived = RepoHealth {
            archived: true,
            days_since_last_commit: Some(1),
            days_since_last_release: Some(1),
            external_prs_merged: 50,
            external_prs_closed: 50,
            has_contributing_guide: true,
            ..RepoHealth::default()
        };
        assert_eq!(MaintenanceSignals::merge_probability(&archived), 0.0);
    }

    #[test]
    fn test_probability_is_clamped() {
        let best = RepoHealth {
            days_since_last_commit: Some(0),
            days_since_last_release: Some(0),
            external_prs_merged: 100,
            external_prs_closed: 100,
            contributor_count_recent: 500,
            has_contributing_guide: true,
            ..RepoHealth::default()
        };
        assert_eq!(MaintenanceSignals::merge_probability(&best), 0.99);

        let worst = RepoHealth {
            days_since_last_commit: Some(5000),
            days_since_last_release: Some(5000),
            external_prs_merged: 0,
            external_prs_closed: 100,
            ..RepoHealth::default()
        };
        assert_eq!(MaintenanceSignals::merge_probability(&worst), 0.01);
    }

    #[test]
    fn test_small_pr_sample_uses_prior() {
        let few = RepoHealth {
            external_prs_merged: 4,
            external_prs_closed: 4,
            ..health(Some(30), Some(30))
        };
        let none = health(Some(30), Some(30));
        assert_eq!(
            MaintenanceSignals::merge_probability(&few),
            MaintenanceSignals::merge_probability(&none)
        );
    }

    #[test]
    fn test_contributing_guide_bonus() {
        let base = health(Some(200), Some(400));
        let with_guide = RepoHealth {
            has_contributing_guide: true,
            ..base.clone()
        };
        let a = MaintenanceSignals::merge_probability(&base);
        let b = MaintenanceSignals::merge_probability(&with_guide);
        assert!((b - a * 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_fresher_commits_raise_probability() {
        let fresh = MaintenanceSignals::merge_probability(&health(Some(10), Some(100)));
        let stale = MaintenanceSignals::merge_probability(&health(Some(400), Some(100)));
        assert!(fresh > stale);
    }

    #[test]
    fn test_liveness_steps() {
        assert_eq!(MaintenanceSignals::liveness_penalty(&health(None, None)), 0.5);
        assert_eq!(MaintenanceSignals::liveness_penalty(&health(Some(10), None)), 1.0);
        assert_eq!(MaintenanceSignals::liveness_penalty(&health(Some(365), None)), 1.0);
        assert_eq!(MaintenanceSignals::liveness_penalty(&health(Some(366), None)), 0.30);
        assert_eq!(MaintenanceSignals::liveness_penalty(&health(Some(731), None)), 0.10);
        let archived = RepoHealth {
            archived: true,
            ..RepoHealth::default()
        };
        assert_eq!(MaintenanceSignals::liveness_penalty(&archived), 0.05);
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(MaintenanceSignals::status(&health(Some(5), None)), PackageStatus::Active);
        assert_eq!(MaintenanceSignals::status(&health(Some(400), None)), PackageStatus::Stale);
        assert_eq!(MaintenanceSignals::status(&health(Some(800), None)), PackageStatus::Dormant);
        assert_eq!(MaintenanceSignals::status(&health(None, None)), PackageStatus::Unknown);
        let archived = RepoHealth {
            archived: true,
            days_since_last_commit: Some(1),
            ..RepoHealth::default()
        };
        assert_eq!(MaintenanceSignals::status(&archived), PackageStatus::Archived);
    }
}
