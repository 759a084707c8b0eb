use crate::eligibility::Bucket;
use crate::index::PreferenceIndex;
use crate::model::{Assignments, ProjectId, StudentId};
use crate::stats;
use eyre::{Error, bail, ensure};
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

pub trait Algo {
    fn assign(&mut self) -> Result<(), Error>;
    fn rounds(&self) -> &[Round];
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Protected,
    General,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Phase::Protected => "protected pre-pass",
            Phase::General => "general fill",
        })
    }
}

/// Snapshot taken after one rank of one phase has been processed.
#[derive(Clone, Debug)]
pub struct Round {
    pub phase: Phase,
    pub rank: usize,
    pub placed: usize,
    pub unassigned: usize,
    pub unassigned_by_bucket: BTreeMap<Bucket, usize>,
}

impl Round {
    pub fn snapshot(a: &Assignments, phase: Phase, rank: usize, placed: usize) -> Round {
        Round {
            phase,
            rank,
            placed,
            unassigned: a.unassigned_count(),
            unassigned_by_bucket: stats::unassigned_by_bucket(a),
        }
    }
}

/// Check that every project and student referenced by the index is known.
pub fn check_index(a: &Assignments, index: &PreferenceIndex) -> Result<(), Error> {
    if let Some(unknown) = index.projects().into_iter().find(|p| p.0 >= a.projects.len()) {
        bail!("preference index references unknown project #{}", unknown.0);
    }
    if let Some(unknown) = index.students().into_iter().find(|s| s.0 >= a.students.len()) {
        bail!("preference index references unknown student #{}", unknown.0);
    }
    ensure!(
        a.unassigned_count() == a.students.len(),
        "assignments must start empty"
    );
    Ok(())
}

/// Walk the students who chose a project at `rank`, in index order, and give
/// a seat to every unassigned one accepted by `admit` while seats remain.
/// Return how many students got placed.
pub fn fill_rank<F>(a: &mut Assignments, index: &PreferenceIndex, rank: usize, admit: F) -> usize
where
    F: Fn(&Assignments, StudentId, ProjectId) -> bool,
{
    let mut placed = 0;
    for (project, students) in index.at_rank(rank) {
        for &student in students {
            if a.is_at_capacity(project) {
                break;
            }
            if a.is_unassigned(student) && admit(&*a, student, project) {
                trace!(
                    project = %a.project(project),
                    student = %a.student(student),
                    rank = %(rank + 1),
                    "Assigning student",
                );
                a.assign_to(student, project);
                placed += 1;
            }
        }
    }
    placed
}
