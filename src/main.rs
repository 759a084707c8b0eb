use crate::algos::{Algo, Greedy, PriorityGreedy, Round};
use crate::config::{AlgorithmKind, Config, DEFAULT_CONFIG};
use crate::eligibility::Classifier;
use crate::index::PreferenceIndex;
use crate::loaders::{Response, Roster};
use crate::model::Assignments;
use crate::report::ReportTable;
use clap::{ArgAction, Parser};
use eyre::Error;
use std::path::{Path, PathBuf};
use tracing::{Level, info};

mod algos;
mod catalog;
mod checks;
mod config;
mod display;
mod eligibility;
mod index;
mod loaders;
mod model;
mod report;
mod stats;
#[cfg(test)]
mod testing;

#[derive(Parser)]
#[command(version, author, about)]
struct Options {
    /// Use FILE instead of rgroups.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Survey responses (CSV)
    #[arg(short, long, value_name = "FILE")]
    responses: PathBuf,
    /// Roster giving display names (CSV)
    #[arg(long, value_name = "FILE")]
    roster: Option<PathBuf>,
    /// Where to write the groups
    #[arg(short, long, value_name = "FILE", default_value = "groups.csv")]
    output: PathBuf,
    /// Override the configured algorithm
    #[arg(short, long)]
    algorithm: Option<AlgorithmKind>,
    /// Do not write the groups file
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Set verbosity level
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

/// Build the model from loaded responses, run the selected algorithm and
/// verify the outcome.
fn allocate(
    config: &Config,
    algorithm: AlgorithmKind,
    responses: Vec<Response>,
    roster: &Roster,
) -> Result<(Assignments, Vec<Round>), Error> {
    let ranks = responses.iter().map(|r| r.choices.len()).max().unwrap_or(0);
    let projects = catalog::build_projects(&config.projects, &responses);
    let students = catalog::build_students(
        responses,
        &projects,
        roster,
        &Classifier::from_config(&config.eligibility),
        config.solver.blank_ranks,
    )?;
    let positions = config.solver.tie_break.positions(&students);
    let index = PreferenceIndex::build(&students, ranks, &positions);

    let mut assignments = Assignments::new(students, projects);
    let rounds = {
        let mut algo: Box<dyn Algo + '_> = match algorithm {
            AlgorithmKind::Priority => Box::new(PriorityGreedy::new(&mut assignments, &index)),
            AlgorithmKind::Greedy => Box::new(Greedy::new(&mut assignments, &index)),
        };
        algo.assign()?;
        algo.rounds().to_vec()
    };
    checks::ensure_consistent(&assignments, algorithm.honors_eligibility())?;
    Ok((assignments, rounds))
}

fn main() -> Result<(), Error> {
    color_eyre::install()?;
    let options = Options::parse();
    let level = match options.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let config = match &options.config {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG))?,
        None => Config::default(),
    };
    let algorithm = options.algorithm.unwrap_or(config.solver.algorithm);

    let responses = loaders::load_responses_from_path(&options.responses, &config.survey)?;
    let roster = match &options.roster {
        Some(path) => loaders::load_roster_from_path(path, &config.roster)?,
        None => Roster::default(),
    };
    let (assignments, rounds) = allocate(&config, algorithm, responses, &roster)?;

    if !options.dry_run {
        ReportTable::from_assignments(&assignments).save(&options.output)?;
        info!(file = %options.output.display(), "Groups written");
    }
    display::display_rounds(&rounds);
    display::display_details(&assignments);
    display::display_stats(&assignments);
    display::display_empty(&assignments);
    display::display_unassigned(&assignments);
    if algorithm.honors_eligibility() {
        display::display_restricted_audit(&assignments);
    }
    display::display_cohorts(&assignments, &config.cohorts);
    display::display_roster_checks(&roster, &assignments);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::Bucket;
    use crate::model::{ProjectId, StudentId};

    const CONFIG: &str = r#"
        [survey]
        rank_columns = ["First", "Second", "Third"]
        eligibility_column = "Quant?"

        [projects]
        names = ["Fama French", "LTCM", "Passive", "Gold Hedging"]
        default_capacity = 2
        restricted = ["Fama French"]

        [projects.capacity]
        "Fama French" = 1
        "Passive" = 0
    "#;

    const RESPONSES: &str = "\
Email Address,First,Second,Third,Quant?
s1@example.org,Fama French,LTCM,Passive,\"Yes, I would strictly prefer it\"
s2@example.org,Fama French,LTCM,Passive,I can do it if unavoidable
s3@example.org,Fama French,Passive,LTCM,
s4@example.org,Passive,LTCM,Fama French,
";

    fn run(config: &Config) -> (Assignments, Vec<Round>) {
        let responses = loaders::load_responses(RESPONSES.as_bytes(), &config.survey).unwrap();
        let roster = loaders::load_roster(
            "Email,First Name,Last Name\ns1@example.org,Sam,One\n".as_bytes(),
            &config.roster,
        )
        .unwrap();
        allocate(config, config.solver.algorithm, responses, &roster).unwrap()
    }

    #[test]
    fn test_survey_scenarios() {
        let config = Config::parse(CONFIG).unwrap();
        let (a, rounds) = run(&config);
        assert_eq!(rounds.len(), 6);
        let fama = ProjectId(0);
        let ltcm = ProjectId(1);
        let passive = ProjectId(2);
        // STRICT s1 takes the single restricted seat before anyone else.
        assert_eq!(a.students_for(fama), &[StudentId(0)]);
        assert_eq!(a.student(StudentId(0)).name, "Sam One");
        // s3 never answered the eligibility question.
        assert_eq!(a.bucket(StudentId(2)), Bucket::Never);
        // Zero capacity: nobody lands on Passive, students fall through.
        assert!(a.students_for(passive).is_empty());
        assert_eq!(a.students_for(ltcm), &[StudentId(1), StudentId(3)]);
        assert_eq!(a.unassigned_students(), vec![StudentId(2)]);
        // A project nobody ranked still gets its column.
        let table = ReportTable::from_assignments(&a);
        assert_eq!(
            table.headers,
            vec!["Fama French", "LTCM", "Passive", "Gold Hedging"]
        );
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.len() == 4 && r[3].is_empty()));
    }

    #[test]
    fn test_blank_answer_never_reaches_restricted_seats() {
        let mut config = Config::parse(CONFIG).unwrap();
        config.projects.capacity.insert("Fama French".to_owned(), 10);
        let (a, _) = run(&config);
        // Restricted seats remain free, yet s3 with a blank answer is sent
        // to a later choice.
        assert_eq!(a.students_for(ProjectId(0)), &[StudentId(0), StudentId(1)]);
        assert_eq!(a.project_for(StudentId(2)), Some(ProjectId(1)));
        assert_eq!(a.project_for(StudentId(3)), Some(ProjectId(1)));
    }

    #[test]
    fn test_greedy_baseline() {
        let mut config = Config::parse(CONFIG).unwrap();
        config.solver.algorithm = AlgorithmKind::Greedy;
        config.projects.capacity.insert("Fama French".to_owned(), 2);
        let (a, rounds) = run(&config);
        assert_eq!(rounds.len(), 3);
        assert_eq!(a.students_for(ProjectId(0)), &[StudentId(0), StudentId(1)]);
        assert_eq!(a.project_for(StudentId(2)), Some(ProjectId(1)));
    }
}
