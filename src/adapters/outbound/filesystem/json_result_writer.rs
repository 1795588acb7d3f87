use crate::application::dto::AnalysisResponse;
use crate::ports::outbound::ResultSink;
use crate::shared::error::AnalyzerError;
use crate::shared::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const LEADERBOARD_FILE: &str = "leaderboard.json";
pub const STATS_FILE: &str = "stats.json";
pub const TARGET_REPOS_FILE: &str = "target-repos.json";

/// JsonResultWriter adapter: writes the run's outputs as pretty JSON files
///
/// The leaderboard holds only the top `leaderboard_size` packages; the
/// target repository list is written in full.
pub struct JsonResultWriter {
    output_dir: PathBuf,
    leaderboard_size: usize,
}

impl JsonResultWriter {
    pub fn new(output_dir: PathBuf, leaderboard_size: usize) -> Self {
        Self {
            output_dir,
            leaderboard_size,
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        Self::reject_symlink(&path)?;

        let json = serde_json::to_string_pretty(value).map_err(|e| AnalyzerError::FileWriteError {
            path: path.clone(),
            details: e.to_string(),
        })?;
        fs::write(&path, json).map_err(|e| AnalyzerError::FileWriteError {
            path: path.clone(),
            details: e.to_string(),
        })?;
        Ok(path)
    }

    /// Writing through a symbolic link could clobber an unrelated file
    fn reject_symlink(path: &Path) -> Result<()> {
        if let Ok(metadata) = fs::symlink_metadata(path) {
            if metadata.is_symlink() {
                return Err(AnalyzerError::FileWriteError {
                    path: path.to_path_buf(),
                    details: "Output path is a symbolic link; refusing to write through it"
                        .to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl ResultSink for JsonResultWriter {
    fn write(&self, response: &AnalysisResponse) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir).map_err(|e| AnalyzerError::FileWriteError {
            path: self.output_dir.clone(),
            details: e.to_string(),
        })?;

        let top = self.leaderboard_size.min(response.packages.len());
        Ok(vec![
            self.write_json(LEADERBOARD_FILE, &response.packages[..top])?,
            self.write_json(STATS_FILE, &response.summary)?,
            self.write_json(TARGET_REPOS_FILE, &response.target_repos)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::{
        Candidate, CandidateSource, GraphData, PackageData, PackageStatus, ReplacementType,
        ScoreBreakdown, ScoredPackage,
    };
    use crate::application::read_models::SummaryStats;
    use tempfile::TempDir;

    fn scored(name: &str, rank: usize) -> ScoredPackage {
        let candidate =
            Candidate::new(name, CandidateSource::Deprecated, ReplacementType::Remove, "").unwrap();
        ScoredPackage {
            data: PackageData::new(candidate, GraphData::empty()),
            scores: ScoreBreakdown {
                impact: 0.1,
                effort_multiplier: 1.0,
                merge_probability: 0.5,
                liveness_penalty: 1.0,
            },
            composite_score: 0.05,
            tier: 4,
            status: PackageStatus::Unknown,
            rank,
            percentile: 100.0,
        }
    }

    fn response() -> AnalysisResponse {
        let packages = vec![scored("a", 1), scored("b", 2), scored("c", 3)];
        AnalysisResponse {
            summary: SummaryStats::build(&packages, &[], None),
            packages,
            target_repos: vec![],
        }
    }

    #[test]
    fn test_writes_three_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("output");
        let writer = JsonResultWriter::new(out.clone(), 2);

        let written = writer.write(&response()).unwrap();
        assert_eq!(written.len(), 3);

        let leaderboard: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(LEADERBOARD_FILE)).unwrap()).unwrap();
        let entries = leaderboard.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], "a");
        assert_eq!(entries[0]["rank"], 1);

        let stats: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(STATS_FILE)).unwrap()).unwrap();
        assert_eq!(stats["candidateCount"], 3);

        let targets = fs::read_to_string(out.join(TARGET_REPOS_FILE)).unwrap();
        assert_eq!(targets.trim(), "[]");
    }

    #[cfg(unix)]
    #[test]
    fn test_refuses_symlinked_output() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("elsewhere.json");
        fs::write(&target, "keep").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join(STATS_FILE)).unwrap();

        let writer = JsonResultWriter::new(dir.path().to_path_buf(), 10);
        let err = writer.write(&response()).unwrap_err();
        assert!(err.to_string().contains("symbolic link"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "keep");
    }
}
