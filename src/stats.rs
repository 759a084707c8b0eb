use crate::eligibility::Bucket;
use crate::loaders::Roster;
use crate::model::{Assignments, ProjectId, StudentId};
use std::collections::{BTreeMap, HashSet};

/// Number of students placed on their choice at each rank.
pub fn statistics(a: &Assignments) -> Vec<usize> {
    let ranks = a.students.iter().map(|s| s.rankings.len()).max().unwrap_or(0);
    let mut placed = vec![0; ranks];
    for project in a.filter_projects(|p| a.is_open(p)) {
        for &student in a.students_for(project) {
            if let Some(rank) = a.rank_of(student, project) {
                placed[rank] += 1;
            }
        }
    }
    let latest = placed.iter().rposition(|&n| n != 0).map_or(0, |n| n + 1);
    placed.truncate(latest);
    placed
}

pub fn unassigned_by_bucket(a: &Assignments) -> BTreeMap<Bucket, usize> {
    let mut counts = Bucket::ALL
        .into_iter()
        .map(|b| (b, 0))
        .collect::<BTreeMap<_, _>>();
    for s in a.unassigned_students() {
        *counts.entry(a.bucket(s)).or_default() += 1;
    }
    counts
}

pub fn strict_students(a: &Assignments) -> Vec<StudentId> {
    a.filter_students(|s| a.bucket(s) == Bucket::Strict)
}

/// STRICT students who did not land on a restricted project.
pub fn strict_without_restricted(a: &Assignments) -> Vec<StudentId> {
    a.filter_students(|s| a.bucket(s) == Bucket::Strict && !a.has_restricted_project(s))
}

/// Non-STRICT students seated on a restricted project, in project order.
pub fn non_strict_in_restricted(a: &Assignments) -> Vec<(StudentId, ProjectId)> {
    a.filter_projects(|p| a.is_restricted(p))
        .into_iter()
        .flat_map(|p| {
            a.students_for(p)
                .iter()
                .filter(|&&s| a.bucket(s) != Bucket::Strict)
                .map(move |&s| (s, p))
        })
        .collect()
}

/// Students whose first choices are exactly `ranked`, with their
/// placement. When `assigned_to` is given, only students placed there are
/// kept.
pub fn cohort(
    a: &Assignments,
    ranked: &[ProjectId],
    assigned_to: Option<ProjectId>,
) -> Vec<(StudentId, Option<ProjectId>)> {
    a.filter_students(|s| {
        let rankings = a.rankings(s);
        rankings.len() >= ranked.len()
            && rankings.iter().zip(ranked).all(|(&r, &p)| r == Some(p))
            && assigned_to.is_none_or(|p| a.project_for(s) == Some(p))
    })
    .into_iter()
    .map(|s| (s, a.project_for(s)))
    .collect()
}

/// Roster members who never answered the survey, in roster order.
pub fn missing_respondents<'a>(roster: &'a Roster, a: &Assignments) -> Vec<&'a str> {
    let respondents = a
        .students
        .iter()
        .map(|s| s.identifier.as_str())
        .collect::<HashSet<_>>();
    roster
        .members()
        .iter()
        .map(String::as_str)
        .filter(|m| !respondents.contains(m))
        .collect()
}

/// Respondents the roster does not know about.
pub fn unknown_respondents(roster: &Roster, a: &Assignments) -> Vec<StudentId> {
    a.filter_students(|s| roster.display_name(&a.student(s).identifier).is_none())
}
