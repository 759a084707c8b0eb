use super::*;
use crate::eligibility::Bucket;

#[derive(Debug)]
pub struct Assignments {
    pub students: Vec<Student>,
    pub projects: Vec<Project>,
    assigned_to: Vec<Option<ProjectId>>,
    assigned: Vec<Vec<StudentId>>,
    unassigned: usize,
}

impl Assignments {
    pub fn new(students: Vec<Student>, projects: Vec<Project>) -> Assignments {
        assert!(
            students.iter().enumerate().all(|(n, s)| s.id == StudentId(n)),
            "student ids must be dense and ordered"
        );
        assert!(
            projects.iter().enumerate().all(|(n, p)| p.id == ProjectId(n)),
            "project ids must be dense and ordered"
        );
        let slen = students.len();
        let plen = projects.len();
        Assignments {
            students,
            projects,
            assigned_to: vec![None; slen],
            assigned: vec![Vec::new(); plen],
            unassigned: slen,
        }
    }

    pub fn student(&self, StudentId(student): StudentId) -> &Student {
        &self.students[student]
    }

    pub fn project(&self, ProjectId(project): ProjectId) -> &Project {
        &self.projects[project]
    }

    pub fn all_projects(&self) -> Vec<ProjectId> {
        self.filter_projects(|_| true)
    }

    pub fn filter_projects<F>(&self, condition: F) -> Vec<ProjectId>
    where
        F: Fn(ProjectId) -> bool,
    {
        (0..self.projects.len())
            .map(ProjectId)
            .filter(|&p| condition(p))
            .collect()
    }

    pub fn all_students(&self) -> Vec<StudentId> {
        self.filter_students(|_| true)
    }

    pub fn filter_students<F>(&self, condition: F) -> Vec<StudentId>
    where
        F: Fn(StudentId) -> bool,
    {
        (0..self.students.len())
            .map(StudentId)
            .filter(|&s| condition(s))
            .collect()
    }

    pub fn find_project(&self, name: &str) -> Option<ProjectId> {
        self.projects.iter().find(|p| p.name == name).map(|p| p.id)
    }

    pub fn rankings(&self, student: StudentId) -> &[Option<ProjectId>] {
        &self.student(student).rankings
    }

    pub fn rank_of(&self, student: StudentId, project: ProjectId) -> Option<usize> {
        self.student(student).rank_of(project)
    }

    pub fn bucket(&self, student: StudentId) -> Bucket {
        self.student(student).bucket
    }

    pub fn project_for(&self, StudentId(student): StudentId) -> Option<ProjectId> {
        self.assigned_to[student]
    }

    pub fn students_for(&self, ProjectId(project): ProjectId) -> &[StudentId] {
        &self.assigned[project]
    }

    pub fn is_restricted(&self, project: ProjectId) -> bool {
        self.project(project).restricted
    }

    pub fn capacity(&self, project: ProjectId) -> u32 {
        self.project(project).capacity
    }

    pub fn size(&self, project: ProjectId) -> u32 {
        self.students_for(project).len() as u32
    }

    pub fn is_open(&self, project: ProjectId) -> bool {
        !self.students_for(project).is_empty()
    }

    pub fn is_at_capacity(&self, project: ProjectId) -> bool {
        self.size(project) >= self.capacity(project)
    }

    pub fn is_unassigned(&self, student: StudentId) -> bool {
        self.project_for(student).is_none()
    }

    /// Assign a student to a project. The student must not be assigned
    /// yet and the project must have a free seat.
    pub fn assign_to(&mut self, student: StudentId, project: ProjectId) {
        assert!(
            self.is_unassigned(student),
            "a project is already assigned to this student"
        );
        assert!(
            !self.is_at_capacity(project),
            "cannot assign to a project at capacity"
        );
        self.assigned_to[student.0] = Some(project);
        self.assigned[project.0].push(student);
        self.unassigned -= 1;
    }

    pub fn unassigned_students(&self) -> Vec<StudentId> {
        self.filter_students(|s| self.is_unassigned(s))
    }

    pub fn unassigned_count(&self) -> usize {
        self.unassigned
    }

    pub fn has_restricted_project(&self, student: StudentId) -> bool {
        self.project_for(student).is_some_and(|p| self.is_restricted(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{project, student};

    fn sample() -> Assignments {
        Assignments::new(
            vec![
                student(0, &[Some(0)], Bucket::Strict),
                student(1, &[Some(0)], Bucket::Never),
                student(2, &[Some(1)], Bucket::CanDo),
            ],
            vec![project(0, 1, true), project(1, 0, false)],
        )
    }

    #[test]
    fn test_assign_updates_both_sides() {
        let mut a = sample();
        assert_eq!(a.unassigned_count(), 3);
        a.assign_to(StudentId(0), ProjectId(0));
        assert_eq!(a.project_for(StudentId(0)), Some(ProjectId(0)));
        assert_eq!(a.students_for(ProjectId(0)), &[StudentId(0)]);
        assert_eq!(a.unassigned_count(), 2);
        assert_eq!(a.unassigned_students(), vec![StudentId(1), StudentId(2)]);
        assert!(a.is_at_capacity(ProjectId(0)));
        assert!(a.has_restricted_project(StudentId(0)));
    }

    #[test]
    fn test_zero_capacity_is_always_full() {
        let a = sample();
        assert!(a.is_at_capacity(ProjectId(1)));
        assert!(!a.is_open(ProjectId(1)));
    }

    #[test]
    #[should_panic(expected = "already assigned")]
    fn test_double_assignment_panics() {
        let mut a = Assignments::new(
            vec![student(0, &[Some(0)], Bucket::Strict)],
            vec![project(0, 2, false), project(1, 2, false)],
        );
        a.assign_to(StudentId(0), ProjectId(0));
        a.assign_to(StudentId(0), ProjectId(1));
    }

    #[test]
    #[should_panic(expected = "at capacity")]
    fn test_over_capacity_panics() {
        let mut a = sample();
        a.assign_to(StudentId(0), ProjectId(0));
        a.assign_to(StudentId(1), ProjectId(0));
    }

    #[test]
    fn test_find_project() {
        let a = sample();
        assert_eq!(a.find_project("P1"), Some(ProjectId(1)));
        assert_eq!(a.find_project("missing"), None);
    }
}
