//! CSV relational instance loader
//!
//! One relation declaration followed by its tuples:
//!
//! ```text
//! r,R,Y,Z,U
//! t,3,8,9
//! t,9,3,8
//! r,T,V,Z
//! t,9,8
//! ```
//!
//! Tuples must match the arity of the most recent declaration.

use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::errors::{DbError, DbResult};
use super::table::Table;
use crate::hypergraph::{EdgeId, Encoding};

/// Named relations, iterated in name order
#[derive(Debug, Clone, Default)]
pub struct Database {
    tables: BTreeMap<String, Table>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        self.tables.insert(name.into(), table);
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Table> {
        self.tables.iter()
    }

    /// Maps every edge named like a relation to that relation's name
    pub fn edge_tables(&self, encoding: &Encoding) -> HashMap<EdgeId, String> {
        self.tables
            .keys()
            .filter_map(|name| encoding.edge_id(name).map(|id| (id, name.clone())))
            .collect()
    }
}

/// Loads an instance from a CSV file
pub fn load_database(path: &Path) -> DbResult<Database> {
    let file = File::open(path).map_err(|source| DbError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_database(file)
}

/// Reads an instance from any CSV source; tables maintain statistics
pub fn read_database<R: Read>(reader: R) -> DbResult<Database> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut db = Database::new();
    let mut current: Option<(String, Table)> = None;

    for (n, record) in csv.records().enumerate() {
        let record = record?;
        let line = n + 1;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        let Some((kind, rest)) = fields.split_first() else {
            continue;
        };

        match kind.as_str() {
            "" if rest.is_empty() => continue,
            "r" => {
                let Some((name, attrs)) = rest.split_first() else {
                    return Err(DbError::malformed(line, "relation declaration without a name"));
                };
                if let Some((prev, table)) = current.take() {
                    db.insert(prev, table);
                }
                if db.get(name).is_some() {
                    return Err(DbError::malformed(line, format!("relation '{}' declared twice", name)));
                }
                let table = Table::with_statistics(attrs.to_vec())?;
                current = Some((name.clone(), table));
            }
            "t" => {
                let Some((name, table)) = current.as_mut() else {
                    return Err(DbError::malformed(line, "tuple before any relation declaration"));
                };
                if rest.len() != table.attributes().len() {
                    return Err(DbError::ArityMismatch {
                        relation: name.clone(),
                        expected: table.attributes().len(),
                        found: rest.len(),
                    });
                }
                table.add_tuple(rest.to_vec())?;
            }
            other => {
                return Err(DbError::malformed(line, format!("unknown record kind '{}'", other)));
            }
        }
    }

    if let Some((name, table)) = current.take() {
        db.insert(name, table);
    }
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::table::row;

    #[test]
    fn test_read_database() {
        let text = "r,R,A,B\nt,1,x\nt,2,y\nr,S,B\nt,y\n";
        let db = read_database(text.as_bytes()).unwrap();
        assert_eq!(db.len(), 2);
        let r = db.get("R").unwrap();
        assert_eq!(r.attributes(), &row(&["A", "B"])[..]);
        assert_eq!(r.len(), 2);
        assert_eq!(r.statistics().unwrap().size(), 2);
        assert_eq!(db.get("S").unwrap().len(), 1);
    }

    #[test]
    fn test_arity_mismatch_names_relation() {
        let err = read_database("r,R,A,B\nt,1\n".as_bytes()).unwrap_err();
        match err {
            DbError::ArityMismatch { relation, expected, found } => {
                assert_eq!(relation, "R");
                assert_eq!((expected, found), (2, 1));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_malformed_records() {
        assert_eq!(read_database("t,1\n".as_bytes()).unwrap_err().code(), "HD_DB_MALFORMED");
        assert_eq!(read_database("x,1\n".as_bytes()).unwrap_err().code(), "HD_DB_MALFORMED");
        assert_eq!(
            read_database("r,R,A\nr,R,B\n".as_bytes()).unwrap_err().code(),
            "HD_DB_MALFORMED"
        );
    }

    #[test]
    fn test_edge_tables() {
        let parsed = crate::hypergraph::parse("R(A,B), S(B), Q(C).").unwrap();
        let db = read_database("r,R,A,B\nr,S,B\nr,Other,Z\n".as_bytes()).unwrap();
        let map = db.edge_tables(&parsed.encoding);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&0], "R");
        assert_eq!(map[&1], "S");
    }
}
