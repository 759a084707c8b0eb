pub use self::assignments::Assignments;
pub use self::project::{Project, ProjectId};
pub use self::student::{Student, StudentId};

mod assignments;
mod project;
mod student;
