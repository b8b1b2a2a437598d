//! Human-readable results on stdout and GML files
//!
//! Logs go to stderr; everything written here is the run's actual output.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use super::errors::CliResult;
use crate::db::Table;
use crate::eval::Cost;
use crate::hypergraph::{Decomp, Encoding};

/// One emitted decomposition, as printed
pub struct Stanza<'a> {
    pub algorithm: &'a str,
    pub index: usize,
    pub width_bound: usize,
    pub decomp: &'a Decomp,
    pub correct: bool,
    pub cost: Option<Cost>,
    pub elapsed: Duration,
}

pub fn write_stanza<W: Write>(out: &mut W, stanza: &Stanza<'_>, encoding: &Encoding) -> CliResult<()> {
    writeln!(out, "Used algorithm: {}", stanza.algorithm)?;
    writeln!(out, "Result {} (ran with K = {})", stanza.index, stanza.width_bound)?;
    write!(out, "{}", stanza.decomp.render(encoding))?;
    writeln!(out, "Time: {} ms", stanza.elapsed.as_millis())?;
    writeln!(out, "Width: {}", stanza.decomp.width())?;
    if let Some(cost) = stanza.cost {
        writeln!(out, "Cost: {}", cost)?;
    }
    writeln!(out, "Correct: {}", stanza.correct)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

pub fn write_summary<W: Write>(out: &mut W, count: usize, elapsed: Duration) -> CliResult<()> {
    writeln!(out, "Search ended in {} ms.", elapsed.as_millis())?;
    writeln!(out, "{} decompositions were found.", count)?;
    out.flush()?;
    Ok(())
}

/// Answer relation as CSV, columns sorted by attribute name
pub fn write_answers<W: Write>(out: &mut W, answers: &Table) -> CliResult<()> {
    let mut columns: Vec<(usize, &String)> = answers.attributes().iter().enumerate().collect();
    columns.sort_by(|a, b| a.1.cmp(b.1));

    let header: Vec<&str> = columns.iter().map(|(_, name)| name.as_str()).collect();
    writeln!(out, "{}", header.join(","))?;

    let mut rows: Vec<Vec<&str>> = answers
        .tuples()
        .iter()
        .map(|t| columns.iter().map(|(i, _)| t[*i].as_str()).collect())
        .collect();
    rows.sort();
    for row in rows {
        writeln!(out, "{}", row.join(","))?;
    }
    writeln!(out, "{} answers", answers.len())?;
    out.flush()?;
    Ok(())
}

/// Writes `decomp` to `<prefix>_<index>.gml`
pub fn write_gml(prefix: &str, index: usize, decomp: &Decomp, encoding: &Encoding) -> CliResult<PathBuf> {
    let path = PathBuf::from(format!("{}_{}.gml", prefix, index));
    fs::write(&path, decomp.to_gml(encoding))?;
    Ok(path)
}
