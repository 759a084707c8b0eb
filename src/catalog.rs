use crate::config::{BlankRanks, ProjectsConfig};
use crate::eligibility::Classifier;
use crate::loaders::{Response, Roster};
use crate::model::{Project, ProjectId, Student, StudentId};
use eyre::{Result, bail, eyre};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Build the project table: the configured projects first, in configuration
/// order, then any project found in the responses only.
pub fn build_projects(config: &ProjectsConfig, responses: &[Response]) -> Vec<Project> {
    let mut known = HashSet::new();
    let mut names = Vec::new();
    for name in &config.names {
        if known.insert(name.as_str()) {
            names.push(name.as_str());
        } else {
            warn!(project = %name, "Project listed twice in configuration");
        }
    }
    for name in responses.iter().flat_map(|r| r.choices.iter().flatten()) {
        if known.insert(name.as_str()) {
            if !config.names.is_empty() {
                warn!(
                    project = %name,
                    capacity = %config.capacity_of(name),
                    "Project chosen in responses is missing from configuration"
                );
            }
            names.push(name.as_str());
        }
    }
    for name in config.restricted.iter().chain(config.capacity.keys()) {
        if !known.contains(name.as_str()) {
            warn!(project = %name, "Configuration refers to an unknown project");
        }
    }
    names
        .into_iter()
        .enumerate()
        .map(|(n, name)| Project {
            id: ProjectId(n),
            name: name.to_owned(),
            capacity: config.capacity_of(name),
            restricted: config.is_restricted(name),
        })
        .collect()
}

/// Turn responses into students, resolving project names, display names and
/// eligibility buckets.
pub fn build_students(
    responses: Vec<Response>,
    projects: &[Project],
    roster: &Roster,
    classifier: &Classifier,
    blank_ranks: BlankRanks,
) -> Result<Vec<Student>> {
    let ids = projects
        .iter()
        .map(|p| (p.name.as_str(), p.id))
        .collect::<HashMap<_, _>>();
    let mut lines = HashMap::new();
    let mut students = Vec::with_capacity(responses.len());
    let mut unnamed = 0;
    for response in responses {
        if let Some(first) = lines.insert(response.identifier.clone(), response.line) {
            bail!(
                "{} answered twice (lines {} and {})",
                response.identifier,
                first,
                response.line
            );
        }
        let mut rankings = Vec::with_capacity(response.choices.len());
        for (rank, choice) in response.choices.iter().enumerate() {
            let project = match choice {
                None if blank_ranks == BlankRanks::Reject => bail!(
                    "{} left rank {} blank (line {})",
                    response.identifier,
                    rank + 1,
                    response.line
                ),
                None => {
                    warn!(
                        student = %response.identifier,
                        rank = %(rank + 1),
                        "Blank rank skipped"
                    );
                    None
                }
                Some(name) => {
                    let project = ids
                        .get(name.as_str())
                        .copied()
                        .ok_or_else(|| eyre!("unknown project {name:?}"))?;
                    if rankings.contains(&Some(project)) {
                        if blank_ranks == BlankRanks::Reject {
                            bail!(
                                "{} ranked {} more than once (line {})",
                                response.identifier,
                                name,
                                response.line
                            );
                        }
                        warn!(
                            student = %response.identifier,
                            project = %name,
                            rank = %(rank + 1),
                            "Repeated choice skipped"
                        );
                        None
                    } else {
                        Some(project)
                    }
                }
            };
            rankings.push(project);
        }
        let name = match roster.display_name(&response.identifier) {
            Some(name) => name.to_owned(),
            None => {
                unnamed += 1;
                response.identifier.clone()
            }
        };
        let bucket = classifier.classify(&response.eligibility);
        students.push(Student {
            id: StudentId(students.len()),
            identifier: response.identifier,
            name,
            rankings,
            eligibility: response.eligibility,
            bucket,
        });
    }
    if unnamed > 0 && !roster.is_empty() {
        warn!(
            students = %unnamed,
            "Respondents missing from roster are named after their identifier"
        );
    }
    info!(
        students = %students.len(),
        projects = %projects.len(),
        "Survey loaded"
    );
    Ok(students)
}
