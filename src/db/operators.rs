//! Relational operators: natural join, semijoin, selection
//!
//! Semijoin and selection reduce their input in place through
//! `Table::remove_tuples`; join builds a fresh table.

use super::errors::DbResult;
use super::table::{Table, Tuple};

/// Positions `(left, right)` of every attribute shared by both tables
fn common_attrs(left: &Table, right: &Table) -> Vec<(usize, usize)> {
    left.attributes()
        .iter()
        .enumerate()
        .filter_map(|(l, attr)| right.position(attr).map(|r| (l, r)))
        .collect()
}

fn matches(left: &Tuple, right: &Tuple, shared: &[(usize, usize)]) -> bool {
    shared.iter().all(|&(l, r)| left[l] == right[r])
}

/// Natural join on all commonly named attributes.
///
/// The larger table drives the outer loop. The result carries the outer
/// table's attributes followed by the inner table's new ones. Duplicates are
/// preserved.
pub fn join(left: &Table, right: &Table) -> DbResult<Table> {
    let (outer, inner) = if left.len() < right.len() {
        (right, left)
    } else {
        (left, right)
    };

    let shared = common_attrs(outer, inner);
    let extra: Vec<usize> = (0..inner.attributes().len())
        .filter(|&i| outer.position(&inner.attributes()[i]).is_none())
        .collect();

    let mut attrs = outer.attributes().to_vec();
    attrs.extend(extra.iter().map(|&i| inner.attributes()[i].clone()));
    let mut result = Table::new(attrs)?;

    for o in outer.tuples() {
        for i in inner.tuples() {
            if matches(o, i, &shared) {
                let mut tuple = o.clone();
                tuple.extend(extra.iter().map(|&p| i[p].clone()));
                result.add_tuple(tuple)?;
            }
        }
    }
    Ok(result)
}

/// Removes from `left` every tuple without a partner in `right`.
///
/// Returns whether any tuple was removed. With no shared attributes this is
/// a no-op returning false.
pub fn semijoin(left: &mut Table, right: &Table) -> DbResult<bool> {
    let shared = common_attrs(left, right);
    if shared.is_empty() {
        return Ok(false);
    }

    let doomed: Vec<usize> = left
        .tuples()
        .iter()
        .enumerate()
        .filter(|(_, l)| !right.tuples().iter().any(|r| matches(*l, r, &shared)))
        .map(|(i, _)| i)
        .collect();
    left.remove_tuples(&doomed)
}

/// Removes every tuple failing `predicate`; returns whether any was removed
pub fn select<F>(table: &mut Table, predicate: F) -> DbResult<bool>
where
    F: Fn(&Tuple) -> bool,
{
    let doomed: Vec<usize> = table
        .tuples()
        .iter()
        .enumerate()
        .filter(|(_, t)| !predicate(*t))
        .map(|(i, _)| i)
        .collect();
    table.remove_tuples(&doomed)
}
