use crate::model::Assignments;
use csv::Writer;
use eyre::{Result, WrapErr};
use std::io::Write;
use std::path::Path;

/// Rectangular table with one column per project, each listing the sorted
/// names of its members, padded with empty cells.
#[derive(Debug)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn from_assignments(a: &Assignments) -> ReportTable {
        let columns = a
            .all_projects()
            .into_iter()
            .map(|p| {
                let mut names = a
                    .students_for(p)
                    .iter()
                    .map(|&s| a.student(s).name.clone())
                    .collect::<Vec<_>>();
                names.sort();
                names
            })
            .collect::<Vec<_>>();
        let height = columns.iter().map(Vec::len).max().unwrap_or(0);
        let rows = (0..height)
            .map(|row| {
                columns
                    .iter()
                    .map(|c| c.get(row).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        ReportTable {
            headers: a.projects.iter().map(|p| p.name.clone()).collect(),
            rows,
        }
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .wrap_err_with(|| format!("cannot create {}", path.display()))?;
        self.write(file)
            .wrap_err_with(|| format!("cannot write report to {}", path.display()))
    }
}
