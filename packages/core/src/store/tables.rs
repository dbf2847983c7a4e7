//! CSV metadata tables
//!
//! Columns are located by header alias (case-insensitive, trimmed), since
//! the same table arrives with English or Indonesian headers depending on
//! who exported it. Rows that cannot be used are counted and skipped.

use super::metadata::{CenterRow, RosterRow, TopicRow};
use crate::error::{EngineError, Result};
use crate::models::ResearcherId;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

const NAME_ALIASES: &[&str] = &["name", "nama", "nama dosen", "researcher", "dosen", "author"];
const CENTER_ALIASES: &[&str] = &[
    "research_center",
    "research center",
    "center",
    "pusat studi",
    "pusat penelitian",
];
const TOPIC_ALIASES: &[&str] = &["topic", "topik", "keyword"];
const WEIGHT_ALIASES: &[&str] = &["weight", "bobot", "score"];
const FACULTY_ALIASES: &[&str] = &["faculty", "fakultas"];
const DEPARTMENT_ALIASES: &[&str] = &["department", "departemen", "prodi"];

/// Rows read from one table plus the number of rows that were dropped
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRows<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

impl<T> SourceRows<T> {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            skipped: 0,
        }
    }
}

/// Read a name -> research center table
pub fn read_research_centers(path: &Path) -> Result<SourceRows<CenterRow>> {
    let mut reader = open_table(path)?;
    let headers = reader.headers()?.clone();
    let name_col = required_column(&headers, NAME_ALIASES, path, "name")?;
    let center_col = required_column(&headers, CENTER_ALIASES, path, "research center")?;

    let mut out = SourceRows::new();
    for record in reader.records() {
        let Ok(record) = record else {
            out.skipped += 1;
            continue;
        };
        match (name_cell(&record, name_col), cell(&record, center_col)) {
            (Some(name), Some(center)) => out.rows.push(CenterRow {
                name,
                research_center: center.to_string(),
            }),
            _ => out.skipped += 1,
        }
    }
    Ok(out)
}

/// Read a name -> (topic, weight) table
pub fn read_topics(path: &Path) -> Result<SourceRows<TopicRow>> {
    let mut reader = open_table(path)?;
    let headers = reader.headers()?.clone();
    let name_col = required_column(&headers, NAME_ALIASES, path, "name")?;
    let topic_col = required_column(&headers, TOPIC_ALIASES, path, "topic")?;
    let weight_col = required_column(&headers, WEIGHT_ALIASES, path, "weight")?;

    let mut out = SourceRows::new();
    for record in reader.records() {
        let Ok(record) = record else {
            out.skipped += 1;
            continue;
        };
        let weight = cell(&record, weight_col)
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|w| w.is_finite());
        match (name_cell(&record, name_col), cell(&record, topic_col), weight) {
            (Some(name), Some(topic), Some(weight)) => out.rows.push(TopicRow {
                name,
                topic: topic.to_string(),
                weight,
            }),
            _ => out.skipped += 1,
        }
    }
    Ok(out)
}

/// Read one organizational roster (name -> faculty, department)
///
/// Either the faculty or the department column may be absent, but not both.
pub fn read_roster(path: &Path) -> Result<SourceRows<RosterRow>> {
    let mut reader = open_table(path)?;
    let headers = reader.headers()?.clone();
    let name_col = required_column(&headers, NAME_ALIASES, path, "name")?;
    let faculty_col = find_column(&headers, FACULTY_ALIASES);
    let department_col = find_column(&headers, DEPARTMENT_ALIASES);
    if faculty_col.is_none() && department_col.is_none() {
        return Err(EngineError::malformed(
            path,
            "no faculty or department column",
        ));
    }

    let mut out = SourceRows::new();
    for record in reader.records() {
        let Ok(record) = record else {
            out.skipped += 1;
            continue;
        };
        let Some(name) = name_cell(&record, name_col) else {
            out.skipped += 1;
            continue;
        };
        let faculty = faculty_col.and_then(|col| cell(&record, col)).map(String::from);
        let department = department_col
            .and_then(|col| cell(&record, col))
            .map(String::from);
        if faculty.is_none() && department.is_none() {
            out.skipped += 1;
            continue;
        }
        out.rows.push(RosterRow {
            name,
            faculty,
            department,
        });
    }
    Ok(out)
}

fn open_table(path: &Path) -> Result<csv::Reader<File>> {
    Ok(ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?)
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .map(normalize_header)
        .position(|header| aliases.contains(&header.as_str()))
}

fn required_column(
    headers: &StringRecord,
    aliases: &[&str],
    path: &Path,
    what: &str,
) -> Result<usize> {
    find_column(headers, aliases)
        .ok_or_else(|| EngineError::malformed(path, format!("no {} column", what)))
}

fn cell(record: &StringRecord, col: usize) -> Option<&str> {
    record.get(col).map(str::trim).filter(|value| !value.is_empty())
}

fn name_cell(record: &StringRecord, col: usize) -> Option<ResearcherId> {
    cell(record, col).map(ResearcherId::new)
}
