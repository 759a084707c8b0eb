use crate::model::{ProjectId, Student, StudentId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Order in which students competing for the same seats are considered.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// First seen in the survey wins.
    #[default]
    InputOrder,
    /// Lexicographic order of identifiers, survey order among equals.
    Identifier,
    /// Seeded random draw, made once for the whole run.
    Lottery(u64),
}

impl TieBreak {
    /// Return the position of every student (indexed by `StudentId`) in the
    /// processing order.
    pub fn positions(self, students: &[Student]) -> Vec<usize> {
        let mut sequence = students.iter().map(|s| s.id).collect::<Vec<_>>();
        match self {
            TieBreak::InputOrder => (),
            TieBreak::Identifier => {
                sequence.sort_by(|&a, &b| students[a.0].identifier.cmp(&students[b.0].identifier));
            }
            TieBreak::Lottery(seed) => {
                sequence.shuffle(&mut StdRng::seed_from_u64(seed));
            }
        }
        let mut positions = vec![0; students.len()];
        for (position, StudentId(s)) in sequence.into_iter().enumerate() {
            positions[s] = position;
        }
        positions
    }
}

/// Students grouped by the project they placed at each rank.
#[derive(Debug, Default)]
pub struct PreferenceIndex {
    ranks: Vec<BTreeMap<ProjectId, Vec<StudentId>>>,
}

impl PreferenceIndex {
    /// Build the index for `ranks` ranks. `positions` gives the processing
    /// order of students inside every list. Blank slots contribute nothing.
    pub fn build(students: &[Student], ranks: usize, positions: &[usize]) -> PreferenceIndex {
        let mut sequence = students.iter().collect::<Vec<_>>();
        sequence.sort_by_key(|s| positions[s.id.0]);
        let ranks = (0..ranks)
            .map(|rank| {
                let mut at_rank: BTreeMap<ProjectId, Vec<StudentId>> = BTreeMap::new();
                for student in &sequence {
                    if let Some(project) = student.project_at_rank(rank) {
                        at_rank.entry(project).or_default().push(student.id);
                    }
                }
                at_rank
            })
            .collect();
        PreferenceIndex { ranks }
    }

    pub fn ranks(&self) -> usize {
        self.ranks.len()
    }

    /// Projects chosen at `rank`, in project order, with the students who
    /// chose them.
    pub fn at_rank(&self, rank: usize) -> impl Iterator<Item = (ProjectId, &[StudentId])> {
        self.ranks[rank].iter().map(|(&p, s)| (p, s.as_slice()))
    }

    pub fn students_at(&self, rank: usize, project: ProjectId) -> &[StudentId] {
        self.ranks
            .get(rank)
            .and_then(|at_rank| at_rank.get(&project))
            .map_or(&[][..], Vec::as_slice)
    }

    pub fn projects(&self) -> BTreeSet<ProjectId> {
        self.ranks.iter().flat_map(|r| r.keys().copied()).collect()
    }

    pub fn students(&self) -> BTreeSet<StudentId> {
        self.ranks
            .iter()
            .flat_map(|r| r.values().flatten().copied())
            .collect()
    }
}
