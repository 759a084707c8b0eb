use crate::algos::Round;
use crate::config::CohortQuery;
use crate::loaders::Roster;
use crate::model::{Assignments, StudentId};
use crate::stats;
use tracing::warn;

fn names_of(a: &Assignments, students: &[StudentId]) -> Vec<String> {
    let mut names = students
        .iter()
        .map(|&s| a.student(s).name.clone())
        .collect::<Vec<_>>();
    names.sort();
    names
}

pub fn display_rounds(rounds: &[Round]) {
    if rounds.is_empty() {
        return;
    }
    println!("Rounds:");
    for r in rounds {
        let buckets = r
            .unassigned_by_bucket
            .iter()
            .map(|(b, n)| format!("{b} {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  - {} rank {}: {} placed, {} unassigned ({})",
            r.phase,
            r.rank + 1,
            r.placed,
            r.unassigned,
            buckets
        );
    }
    println!();
}

pub fn display_details(a: &Assignments) {
    for p in a.filter_projects(|p| a.is_open(p)) {
        let project = a.project(p);
        println!(
            "{}{} ({}/{}):",
            project,
            if project.restricted { " [restricted]" } else { "" },
            a.size(p),
            a.capacity(p)
        );
        let mut students = a.students_for(p).to_vec();
        students.sort_by_key(|&s| a.student(s).name.clone());
        for s in students {
            print!("  - {}", a.student(s));
            if let Some(rank) = a.rank_of(s, p) {
                print!(" (rank {})", rank + 1);
            }
            if project.restricted {
                print!(" ({})", a.bucket(s));
            }
            println!();
        }
        println!();
    }
}

pub fn display_stats(a: &Assignments) {
    let students = a.students.len();
    let lazy = a.students.iter().filter(|s| s.is_lazy()).count();
    println!(
        "Students assigned/unassigned/total: {}/{}/{} ({} without any choice)",
        students - a.unassigned_count(),
        a.unassigned_count(),
        students,
        lazy
    );
    let ranks = stats::statistics(a);
    let cumul = ranks.iter().scan(0, |s, &r| {
        *s += r;
        Some(*s)
    });
    let total: usize = ranks.iter().sum();
    println!("Final ranking:");
    for (rank, (n, c)) in ranks.iter().zip(cumul).enumerate() {
        if *n != 0 {
            println!(
                "  - rank {}: {} (cumulative {} - {:.2}%)",
                rank + 1,
                n,
                c,
                100.0 * c as f32 / total as f32
            );
        }
    }
}

pub fn display_empty(a: &Assignments) {
    let projects = a.filter_projects(|p| !a.is_open(p));
    if !projects.is_empty() {
        println!("Empty projects:");
        for p in projects {
            println!("  - {} (capacity {})", a.project(p), a.capacity(p));
        }
    }
}

pub fn display_unassigned(a: &Assignments) {
    let unassigned = a.unassigned_students();
    if unassigned.is_empty() {
        return;
    }
    let counts = stats::unassigned_by_bucket(a)
        .into_iter()
        .map(|(b, n)| format!("{b} {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Unassigned students ({counts}):");
    for s in unassigned {
        let student = a.student(s);
        println!("  - {} <{}> ({})", student, student.identifier, student.bucket);
    }
}

pub fn display_restricted_audit(a: &Assignments) {
    let strict = stats::strict_students(a);
    let missed = stats::strict_without_restricted(a);
    println!(
        "Students strictly preferring restricted projects: {} ({} placed on one, {} not)",
        strict.len(),
        strict.len() - missed.len(),
        missed.len()
    );
    for name in names_of(a, &missed) {
        println!("  - {name}");
    }
    let leaked = stats::non_strict_in_restricted(a);
    println!(
        "Students on restricted projects without strict preference: {}",
        leaked.len()
    );
    for (s, p) in leaked {
        let student = a.student(s);
        println!(
            "  - {} <{}> in {} ({}, answered {:?})",
            student,
            student.identifier,
            a.project(p),
            student.bucket,
            student.eligibility.to_string()
        );
    }
}

pub fn display_cohorts(a: &Assignments, cohorts: &[CohortQuery]) {
    for query in cohorts {
        let Some(ranked) = query
            .ranked
            .iter()
            .map(|name| a.find_project(name))
            .collect::<Option<Vec<_>>>()
        else {
            warn!(cohort = %query.name, "Cohort refers to an unknown project");
            continue;
        };
        let assigned_to = match query.assigned_to.as_deref() {
            Some(name) => {
                let Some(p) = a.find_project(name) else {
                    warn!(cohort = %query.name, project = %name, "Cohort refers to an unknown project");
                    continue;
                };
                Some(p)
            }
            None => None,
        };
        let members = stats::cohort(a, &ranked, assigned_to);
        println!("{} ({}):", query.name, members.len());
        for (s, p) in members {
            let student = a.student(s);
            match p {
                Some(p) => println!("  - {} <{}> in {}", student, student.identifier, a.project(p)),
                None => println!("  - {} <{}> unassigned", student, student.identifier),
            }
        }
    }
}

pub fn display_roster_checks(roster: &Roster, a: &Assignments) {
    if roster.is_empty() {
        return;
    }
    let missing = stats::missing_respondents(roster, a);
    if !missing.is_empty() {
        println!("Roster members without a response ({}):", missing.len());
        for identifier in missing {
            println!("  - {}", roster.display_name(identifier).unwrap_or(identifier));
        }
    }
    let unknown = stats::unknown_respondents(roster, a);
    if !unknown.is_empty() {
        println!("Respondents missing from the roster ({}):", unknown.len());
        for s in unknown {
            println!("  - {}", a.student(s).identifier);
        }
    }
}
