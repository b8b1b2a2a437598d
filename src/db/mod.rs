//! Relational tables and operators
//!
//! Tables hold string-valued tuples over named attributes. The operators
//! are the ones the Yannakakis evaluator needs: natural join, in-place
//! semijoin and in-place selection.

mod errors;
mod loader;
mod operators;
mod table;

pub use errors::{DbError, DbResult};
pub use loader::{load_database, read_database, Database};
pub use operators::{join, select, semijoin};
pub use table::{Table, Tuple};
