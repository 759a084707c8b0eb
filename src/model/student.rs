use super::ProjectId;
use crate::eligibility::{Bucket, Eligibility};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StudentId(pub usize);

#[derive(Clone, Debug)]
pub struct Student {
    pub id: StudentId,
    /// Stable identifier coming from the survey (usually an email address).
    pub identifier: String,
    pub name: String,
    /// Choices by rank, `None` marking a slot left blank.
    pub rankings: Vec<Option<ProjectId>>,
    pub eligibility: Eligibility,
    pub bucket: Bucket,
}

impl Student {
    pub fn rank_of(&self, project: ProjectId) -> Option<usize> {
        self.rankings.iter().position(|&p| p == Some(project))
    }

    pub fn project_at_rank(&self, rank: usize) -> Option<ProjectId> {
        self.rankings.get(rank).copied().flatten()
    }

    pub fn is_lazy(&self) -> bool {
        self.rankings.iter().all(Option::is_none)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
