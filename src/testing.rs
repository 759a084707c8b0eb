//! Fixture builders shared by unit tests.

use crate::eligibility::{Bucket, Eligibility};
use crate::index::{PreferenceIndex, TieBreak};
use crate::model::{Project, ProjectId, Student, StudentId};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub fn student(n: usize, rankings: &[Option<usize>], bucket: Bucket) -> Student {
    Student {
        id: StudentId(n),
        identifier: format!("s{n}@example.org"),
        name: format!("Student {n}"),
        rankings: rankings.iter().map(|r| r.map(ProjectId)).collect(),
        eligibility: Eligibility::Missing,
        bucket,
    }
}

pub fn project(n: usize, capacity: u32, restricted: bool) -> Project {
    Project {
        id: ProjectId(n),
        name: format!("P{n}"),
        capacity,
        restricted,
    }
}

/// Random instance with up to `max_students` students ranking three
/// distinct projects each, some slots left blank.
pub fn random_instance(rng: &mut StdRng, max_students: usize) -> (Vec<Student>, Vec<Project>) {
    let plen = rng.random_range(3..7);
    let projects = (0..plen)
        .map(|n| project(n, rng.random_range(0..6), rng.random_bool(0.4)))
        .collect::<Vec<_>>();
    let slen = rng.random_range(0..=max_students);
    let students = (0..slen)
        .map(|n| {
            let mut choices = (0..plen).collect::<Vec<_>>();
            choices.shuffle(rng);
            let rankings = choices
                .into_iter()
                .take(3)
                .map(|p| if rng.random_bool(0.9) { Some(p) } else { None })
                .collect::<Vec<_>>();
            student(n, &rankings, Bucket::ALL[rng.random_range(0..3)])
        })
        .collect();
    (students, projects)
}

pub fn index_for(students: &[Student]) -> PreferenceIndex {
    let positions = TieBreak::InputOrder.positions(students);
    let ranks = students.iter().map(|s| s.rankings.len()).max().unwrap_or(0);
    PreferenceIndex::build(students, ranks, &positions)
}
