use super::algo::{check_index, fill_rank};
use super::{Algo, Phase, Round};
use crate::eligibility::Bucket;
use crate::index::PreferenceIndex;
use crate::model::Assignments;
use eyre::Error;
use tracing::{debug, info, instrument, warn};

/// Give STRICT students the first claim on restricted seats, then fill
/// every project rank by rank, keeping NEVER students out of restricted
/// projects.
pub struct PriorityGreedy<'a> {
    assignments: &'a mut Assignments,
    index: &'a PreferenceIndex,
    rounds: Vec<Round>,
}

impl<'a> PriorityGreedy<'a> {
    pub fn new(assignments: &'a mut Assignments, index: &'a PreferenceIndex) -> PriorityGreedy<'a> {
        PriorityGreedy {
            assignments,
            index,
            rounds: Vec::new(),
        }
    }

    /// Seat STRICT students on the restricted projects they ranked, best
    /// rank first.
    #[instrument(skip_all)]
    fn protected_pre_pass(&mut self) {
        for rank in 0..self.index.ranks() {
            let placed = fill_rank(self.assignments, self.index, rank, |a, s, p| {
                a.is_restricted(p) && a.bucket(s) == Bucket::Strict
            });
            self.record(Phase::Protected, rank, placed);
        }
    }

    /// Seat everyone else in rank order. CAN_DO and STRICT students compete
    /// on equal terms for what is left of restricted projects.
    #[instrument(skip_all)]
    fn general_fill(&mut self) {
        for rank in 0..self.index.ranks() {
            let placed = fill_rank(self.assignments, self.index, rank, |a, s, p| {
                !a.is_restricted(p) || a.bucket(s).may_take_restricted()
            });
            self.record(Phase::General, rank, placed);
        }
    }

    fn record(&mut self, phase: Phase, rank: usize, placed: usize) {
        let round = Round::snapshot(self.assignments, phase, rank, placed);
        debug!(
            phase = %phase,
            rank = %(rank + 1),
            placed = %placed,
            unassigned = %round.unassigned,
            "Rank processed",
        );
        self.rounds.push(round);
    }
}

impl Algo for PriorityGreedy<'_> {
    fn assign(&mut self) -> Result<(), Error> {
        check_index(self.assignments, self.index)?;

        self.protected_pre_pass();
        let strict_restricted = self
            .assignments
            .filter_students(|s| {
                self.assignments.bucket(s) == Bucket::Strict
                    && self.assignments.has_restricted_project(s)
            })
            .len();
        info!(
            strict_students_placed = %strict_restricted,
            "Protected pre-pass done"
        );

        self.general_fill();
        let unassigned = self.assignments.unassigned_count();
        if unassigned > 0 {
            warn!(
                unassigned_students = %unassigned,
                "Some students could not be placed on any of their choices"
            );
        }
        Ok(())
    }

    fn rounds(&self) -> &[Round] {
        &self.rounds
    }
}
