use super::algo::{check_index, fill_rank};
use super::{Algo, Phase, Round};
use crate::index::PreferenceIndex;
use crate::model::Assignments;
use eyre::Error;
use tracing::{debug, instrument, warn};

/// Baseline fill: rank by rank, first come first served, with no regard for
/// eligibility buckets or restricted projects.
pub struct Greedy<'a> {
    assignments: &'a mut Assignments,
    index: &'a PreferenceIndex,
    rounds: Vec<Round>,
}

impl<'a> Greedy<'a> {
    pub fn new(assignments: &'a mut Assignments, index: &'a PreferenceIndex) -> Greedy<'a> {
        Greedy {
            assignments,
            index,
            rounds: Vec::new(),
        }
    }

    #[instrument(skip_all)]
    fn fill(&mut self) {
        for rank in 0..self.index.ranks() {
            let placed = fill_rank(self.assignments, self.index, rank, |_, _, _| true);
            let round = Round::snapshot(self.assignments, Phase::General, rank, placed);
            debug!(
                rank = %(rank + 1),
                placed = %placed,
                unassigned = %round.unassigned,
                "Rank processed",
            );
            self.rounds.push(round);
        }
    }
}

impl Algo for Greedy<'_> {
    fn assign(&mut self) -> Result<(), Error> {
        check_index(self.assignments, self.index)?;
        self.fill();
        if self.assignments.unassigned_count() > 0 {
            warn!(
                unassigned_students = %self.assignments.unassigned_count(),
                "Some students could not be placed on any of their choices"
            );
        }
        Ok(())
    }

    fn rounds(&self) -> &[Round] {
        &self.rounds
    }
}
