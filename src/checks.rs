use crate::model::Assignments;
use eyre::{Error, bail, ensure};
use std::collections::HashSet;

/// Verify that the assignment can be published: no project over capacity,
/// every student on at most one project, both sides of the mapping in
/// agreement and, when `honor_eligibility` is set, no NEVER student on a
/// restricted project.
pub fn ensure_consistent(a: &Assignments, honor_eligibility: bool) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for p in a.all_projects() {
        ensure!(
            a.size(p) <= a.capacity(p),
            "project {} has {} students for a capacity of {}",
            a.project(p),
            a.size(p),
            a.capacity(p)
        );
        for &s in a.students_for(p) {
            if !seen.insert(s) {
                bail!("student {} is assigned more than once", a.student(s));
            }
            ensure!(
                a.project_for(s) == Some(p),
                "student {} is listed on project {} but assigned elsewhere",
                a.student(s),
                a.project(p)
            );
            if honor_eligibility && a.is_restricted(p) {
                ensure!(
                    a.bucket(s).may_take_restricted(),
                    "student {} ({}) is assigned to restricted project {}",
                    a.student(s),
                    a.bucket(s),
                    a.project(p)
                );
            }
        }
    }
    for s in a.all_students() {
        if let Some(p) = a.project_for(s) {
            ensure!(
                a.students_for(p).contains(&s),
                "student {} is assigned to project {} but not listed there",
                a.student(s),
                a.project(p)
            );
        }
    }
    ensure!(
        seen.len() + a.unassigned_count() == a.students.len(),
        "assigned and unassigned students do not add up"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::Bucket;
    use crate::model::{ProjectId, StudentId};
    use crate::testing::{project, student};

    #[test]
    fn test_never_student_on_restricted_project() {
        let mut a = Assignments::new(
            vec![student(0, &[Some(0)], Bucket::Never)],
            vec![project(0, 1, true)],
        );
        ensure_consistent(&a, true).unwrap();
        a.assign_to(StudentId(0), ProjectId(0));
        assert!(ensure_consistent(&a, true).is_err());
        ensure_consistent(&a, false).unwrap();
    }

    #[test]
    fn test_valid_assignment() {
        let mut a = Assignments::new(
            vec![
                student(0, &[Some(0)], Bucket::CanDo),
                student(1, &[Some(1)], Bucket::Never),
                student(2, &[Some(1)], Bucket::Never),
            ],
            vec![project(0, 1, true), project(1, 1, false)],
        );
        a.assign_to(StudentId(0), ProjectId(0));
        a.assign_to(StudentId(1), ProjectId(1));
        ensure_consistent(&a, true).unwrap();
    }
}
