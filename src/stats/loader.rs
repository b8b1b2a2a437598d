//! Statistics and size-estimate loaders
//!
//! Statistics rows, where `e1..en` name hyperedges and `col` a vertex:
//!
//! ```text
//! size,e1,e2,1200
//! ndv,e1,e2,col,35
//! ```
//!
//! Estimate rows give a raw cost per edge combination:
//!
//! ```text
//! e1,e2,1200
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::cache::{SizeEstimates, StatisticsDb};
use super::errors::{StatsError, StatsResult};
use super::statistics::Statistics;
use crate::db::Database;
use crate::hypergraph::{EdgeSetKey, Encoding, Hypergraph};

fn open(path: &Path) -> StatsResult<File> {
    File::open(path).map_err(|e| StatsError::malformed(format!("{}: {}", path.display(), e)))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn parse_value(field: &str, line: usize) -> StatsResult<u64> {
    field
        .parse::<u64>()
        .map_err(|_| StatsError::malformed(format!("line {}: '{}' is not a count", line, field)))
}

/// Resolves edge names into a key, checking they exist in `graph`
fn edge_key(names: &[String], graph: &Hypergraph, encoding: &Encoding, line: usize) -> StatsResult<EdgeSetKey> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let id = encoding
            .edge_id(name)
            .filter(|id| graph.edge(*id).is_some())
            .ok_or_else(|| StatsError::malformed(format!("line {}: unknown edge '{}'", line, name)))?;
        ids.push(id);
    }
    if ids.is_empty() {
        return Err(StatsError::malformed(format!("line {}: no edges named", line)));
    }
    Ok(EdgeSetKey::new(ids))
}

/// Vertex names of the edges in `key`, in order of first appearance
pub fn edge_set_attributes(key: &EdgeSetKey, graph: &Hypergraph, encoding: &Encoding) -> Vec<String> {
    let mut attrs: Vec<String> = Vec::new();
    for id in key.ids() {
        let Some(edge) = graph.edge(*id) else { continue };
        for v in &edge.vertices {
            let name = encoding.vertex_name(*v);
            if !attrs.iter().any(|a| a == name) {
                attrs.push(name.to_string());
            }
        }
    }
    attrs
}

pub fn load_statistics(path: &Path, graph: &Hypergraph, encoding: &Encoding) -> StatsResult<StatisticsDb> {
    read_statistics(open(path)?, graph, encoding)
}

/// Reads estimate-backed statistics (sizes and NDVs, no histograms)
pub fn read_statistics<R: Read>(reader: R, graph: &Hypergraph, encoding: &Encoding) -> StatsResult<StatisticsDb> {
    let mut db = StatisticsDb::new();
    for (n, record) in csv_reader(reader).records().enumerate() {
        let line = n + 1;
        let record = record.map_err(|e| StatsError::malformed(format!("line {}: {}", line, e)))?;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if fields.len() < 3 {
            return Err(StatsError::malformed(format!("line {}: too few fields", line)));
        }
        let last = fields.len() - 1;
        let val = parse_value(&fields[last], line)?;

        match fields[0].as_str() {
            "size" => {
                let key = edge_key(&fields[1..last], graph, encoding, line)?;
                entry(&mut db, key, graph, encoding).set_size(val);
            }
            "ndv" => {
                if fields.len() < 4 {
                    return Err(StatsError::malformed(format!("line {}: ndv row needs a column", line)));
                }
                let key = edge_key(&fields[1..last - 1], graph, encoding, line)?;
                let col = &fields[last - 1];
                if !entry(&mut db, key, graph, encoding).set_ndv(col, val) {
                    return Err(StatsError::malformed(format!(
                        "line {}: '{}' is not a vertex of those edges",
                        line, col
                    )));
                }
            }
            other => {
                return Err(StatsError::malformed(format!("line {}: unknown tag '{}'", line, other)));
            }
        }
    }
    Ok(db)
}

fn entry<'a>(db: &'a mut StatisticsDb, key: EdgeSetKey, graph: &Hypergraph, encoding: &Encoding) -> &'a mut Statistics {
    let attrs = || Statistics::new(edge_set_attributes(&key, graph, encoding));
    db.get_or_insert_with(key.clone(), attrs)
}

pub fn load_estimates(path: &Path, graph: &Hypergraph, encoding: &Encoding) -> StatsResult<SizeEstimates> {
    read_estimates(open(path)?, graph, encoding)
}

pub fn read_estimates<R: Read>(reader: R, graph: &Hypergraph, encoding: &Encoding) -> StatsResult<SizeEstimates> {
    let mut estimates = SizeEstimates::new();
    for (n, record) in csv_reader(reader).records().enumerate() {
        let line = n + 1;
        let record = record.map_err(|e| StatsError::malformed(format!("line {}: {}", line, e)))?;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        let Some((cost, names)) = fields.split_last() else {
            continue;
        };
        let cost = parse_value(cost, line)?;
        let key = edge_key(names, graph, encoding, line)?;
        estimates.put(key, cost)?;
    }
    Ok(estimates)
}

/// Exact single-edge statistics for every relation named like an edge
pub fn stats_from_db(db: &Database, encoding: &Encoding) -> StatisticsDb {
    let mut out = StatisticsDb::new();
    for (id, name) in db.edge_tables(encoding) {
        if let Some(table) = db.get(&name) {
            out.put(EdgeSetKey::new([id]), table.compute_statistics());
        }
    }
    out
}
