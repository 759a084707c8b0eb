use crate::index::TieBreak;
use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = "rgroups.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub solver: SolverConfig,
    pub survey: SurveyConfig,
    pub roster: RosterConfig,
    pub projects: ProjectsConfig,
    pub eligibility: EligibilityConfig,
    #[serde(rename = "cohort")]
    pub cohorts: Vec<CohortQuery>,
}

impl Config {
    pub fn load(file_name: &Path) -> Result<Config> {
        let text = fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load configuration file {}", file_name.display()))?;
        Config::parse(&text)
            .wrap_err_with(|| format!("cannot parse configuration file {}", file_name.display()))
    }

    pub fn parse(text: &str) -> Result<Config> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
    /// STRICT pre-pass on restricted projects, then greedy fill.
    #[default]
    Priority,
    /// Rank-ordered greedy fill ignoring eligibility.
    Greedy,
}

impl AlgorithmKind {
    pub fn honors_eligibility(self) -> bool {
        self == AlgorithmKind::Priority
    }
}

/// What to do with a rank slot left blank.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum BlankRanks {
    #[default]
    Skip,
    Reject,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub algorithm: AlgorithmKind,
    pub tie_break: TieBreak,
    pub blank_ranks: BlankRanks,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurveyConfig {
    pub id_column: String,
    /// Named rank columns, most preferred first. When empty, `ranks`
    /// columns starting at index `first_rank_column` are used.
    pub rank_columns: Vec<String>,
    pub first_rank_column: usize,
    pub ranks: usize,
    pub eligibility_column: String,
}

impl Default for SurveyConfig {
    fn default() -> SurveyConfig {
        SurveyConfig {
            id_column: "Email Address".to_owned(),
            rank_columns: Vec::new(),
            first_rank_column: 2,
            ranks: 5,
            eligibility_column: "Would you be willing to do a quant project?".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub id_column: String,
    pub first_name_column: String,
    pub last_name_column: String,
}

impl Default for RosterConfig {
    fn default() -> RosterConfig {
        RosterConfig {
            id_column: "Email".to_owned(),
            first_name_column: "First Name".to_owned(),
            last_name_column: "Last Name".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectsConfig {
    /// Canonical project order, also used for the report columns.
    pub names: Vec<String>,
    pub default_capacity: u32,
    pub capacity: BTreeMap<String, u32>,
    pub restricted: Vec<String>,
}

impl Default for ProjectsConfig {
    fn default() -> ProjectsConfig {
        ProjectsConfig {
            names: Vec::new(),
            default_capacity: 10,
            capacity: BTreeMap::new(),
            restricted: Vec::new(),
        }
    }
}

impl ProjectsConfig {
    pub fn capacity_of(&self, name: &str) -> u32 {
        self.capacity
            .get(name)
            .copied()
            .unwrap_or(self.default_capacity)
    }

    pub fn is_restricted(&self, name: &str) -> bool {
        self.restricted.iter().any(|r| r == name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EligibilityConfig {
    pub strict: Vec<String>,
    pub can_do: Vec<String>,
}

impl Default for EligibilityConfig {
    fn default() -> EligibilityConfig {
        EligibilityConfig {
            strict: vec!["strictly prefer".to_owned()],
            can_do: vec!["unavoidable".to_owned()],
        }
    }
}

/// Students who ranked `ranked` at ranks 1, 2, ... in this order, optionally
/// restricted to those placed on `assigned_to`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CohortQuery {
    pub name: String,
    pub ranked: Vec<String>,
    pub assigned_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_configuration_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.solver.algorithm, AlgorithmKind::Priority);
        assert_eq!(config.solver.tie_break, TieBreak::InputOrder);
        assert_eq!(config.solver.blank_ranks, BlankRanks::Skip);
        assert_eq!(config.survey.id_column, "Email Address");
        assert_eq!(config.survey.first_rank_column, 2);
        assert_eq!(config.survey.ranks, 5);
        assert_eq!(config.roster.id_column, "Email");
        assert_eq!(config.projects.default_capacity, 10);
        assert_eq!(config.eligibility.strict, vec!["strictly prefer"]);
        assert!(config.cohorts.is_empty());
    }

    #[test]
    fn test_full_configuration() {
        let config = Config::parse(
            r#"
            [solver]
            algorithm = "greedy"
            tie_break = { lottery = 42 }
            blank_ranks = "reject"

            [survey]
            rank_columns = ["First", "Second"]

            [projects]
            names = ["Fama French Regressions", "LTCM"]
            default_capacity = 8
            restricted = ["Fama French Regressions"]

            [projects.capacity]
            "Fama French Regressions" = 14

            [[cohort]]
            name = "Fama first, LTCM second"
            ranked = ["Fama French Regressions", "LTCM"]
            assigned_to = "LTCM"
            "#,
        )
        .unwrap();
        assert_eq!(config.solver.algorithm, AlgorithmKind::Greedy);
        assert_eq!(config.solver.tie_break, TieBreak::Lottery(42));
        assert_eq!(config.solver.blank_ranks, BlankRanks::Reject);
        assert_eq!(config.survey.rank_columns, vec!["First", "Second"]);
        assert_eq!(config.survey.id_column, "Email Address");
        assert_eq!(config.projects.capacity_of("Fama French Regressions"), 14);
        assert_eq!(config.projects.capacity_of("LTCM"), 8);
        assert!(config.projects.is_restricted("Fama French Regressions"));
        assert!(!config.projects.is_restricted("LTCM"));
        assert_eq!(config.cohorts.len(), 1);
        assert_eq!(config.cohorts[0].assigned_to.as_deref(), Some("LTCM"));
    }

    #[test]
    fn test_identifier_tie_break() {
        let config = Config::parse("[solver]\ntie_break = \"identifier\"\n").unwrap();
        assert_eq!(config.solver.tie_break, TieBreak::Identifier);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::parse("[solver]\nalgo = \"greedy\"\n").is_err());
        assert!(Config::parse("[solver]\nalgorithm = \"hungarian\"\n").is_err());
    }

    #[test]
    fn test_sample_configuration() {
        let config = Config::parse(include_str!("../rgroups.sample.toml")).unwrap();
        assert_eq!(config.projects.names.len(), 8);
        assert_eq!(config.projects.capacity_of("PCA (ML in Finance)"), 14);
        assert_eq!(config.projects.capacity_of("LTCM"), 10);
        assert!(config.projects.is_restricted("PCA (ML in Finance)"));
        assert_eq!(config.cohorts[0].assigned_to, None);
    }
}
