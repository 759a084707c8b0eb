use crate::config::{RosterConfig, SurveyConfig};
use crate::eligibility::Eligibility;
use csv::{ReaderBuilder, StringRecord, Trim};
use eyre::{Result, WrapErr, bail, ensure, eyre};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace, warn};

/// One survey row.
#[derive(Clone, Debug)]
pub struct Response {
    pub line: u64,
    pub identifier: String,
    /// Project names by rank, `None` for a blank slot.
    pub choices: Vec<Option<String>>,
    pub eligibility: Eligibility,
}

/// Display names by identifier, in roster order.
#[derive(Debug, Default)]
pub struct Roster {
    names: HashMap<String, String>,
    members: Vec<String>,
}

impl Roster {
    pub fn display_name(&self, identifier: &str) -> Option<&str> {
        self.names
            .get(identifier)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn required_column(headers: &StringRecord, name: &str, source: &str) -> Result<usize> {
    column(headers, name).ok_or_else(|| eyre!("column {name:?} not found in {source}"))
}

fn field(record: &StringRecord, index: usize) -> Option<&str> {
    record.get(index).filter(|f| !f.is_empty())
}

fn line_of(record: &StringRecord, n: usize) -> u64 {
    record.position().map_or(n as u64 + 2, |p| p.line())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).wrap_err_with(|| format!("cannot open {}", path.display()))
}

pub fn load_responses_from_path(path: &Path, survey: &SurveyConfig) -> Result<Vec<Response>> {
    load_responses(open(path)?, survey)
        .wrap_err_with(|| format!("cannot load responses from {}", path.display()))
}

pub fn load_responses<R: Read>(reader: R, survey: &SurveyConfig) -> Result<Vec<Response>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().wrap_err("cannot read headers")?.clone();
    let id_column = required_column(&headers, &survey.id_column, "responses")?;
    let rank_columns = if survey.rank_columns.is_empty() {
        let last = survey.first_rank_column + survey.ranks;
        ensure!(
            last <= headers.len(),
            "responses have {} columns, rank columns {}..{} requested",
            headers.len(),
            survey.first_rank_column,
            last
        );
        (survey.first_rank_column..last).collect::<Vec<_>>()
    } else {
        survey
            .rank_columns
            .iter()
            .map(|name| required_column(&headers, name, "responses"))
            .collect::<Result<Vec<_>>>()?
    };
    let eligibility_column = column(&headers, &survey.eligibility_column);
    if eligibility_column.is_none() {
        warn!(
            column = %survey.eligibility_column,
            "Eligibility column not found, every answer is considered missing"
        );
    }
    let mut responses = Vec::new();
    for (n, record) in reader.records().enumerate() {
        let record = record.wrap_err_with(|| format!("cannot read response #{}", n + 1))?;
        let line = line_of(&record, n);
        if record.iter().all(str::is_empty) {
            debug!(line = %line, "Skipping empty response row");
            continue;
        }
        let Some(identifier) = field(&record, id_column) else {
            bail!("response at line {line} has no {:?}", survey.id_column);
        };
        let response = Response {
            line,
            identifier: identifier.to_owned(),
            choices: rank_columns
                .iter()
                .map(|&c| field(&record, c).map(String::from))
                .collect(),
            eligibility: Eligibility::from(eligibility_column.and_then(|c| field(&record, c))),
        };
        trace!(identifier = %response.identifier, choices = ?response.choices, "Response loaded");
        responses.push(response);
    }
    Ok(responses)
}

pub fn load_roster_from_path(path: &Path, roster: &RosterConfig) -> Result<Roster> {
    load_roster(open(path)?, roster)
        .wrap_err_with(|| format!("cannot load roster from {}", path.display()))
}

pub fn load_roster<R: Read>(reader: R, roster: &RosterConfig) -> Result<Roster> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().wrap_err("cannot read headers")?.clone();
    let id_column = required_column(&headers, &roster.id_column, "roster")?;
    let first_column = required_column(&headers, &roster.first_name_column, "roster")?;
    let last_column = required_column(&headers, &roster.last_name_column, "roster")?;
    let mut result = Roster::default();
    for (n, record) in reader.records().enumerate() {
        let record = record.wrap_err_with(|| format!("cannot read roster entry #{}", n + 1))?;
        let Some(identifier) = field(&record, id_column) else {
            debug!(line = %line_of(&record, n), "Skipping roster entry without identifier");
            continue;
        };
        let name = [field(&record, first_column), field(&record, last_column)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        match result.names.entry(identifier.to_owned()) {
            Entry::Occupied(_) => {
                warn!(identifier = %identifier, "Duplicate roster entry ignored");
                continue;
            }
            Entry::Vacant(entry) => {
                entry.insert(name);
            }
        }
        result.members.push(identifier.to_owned());
    }
    Ok(result)
}
