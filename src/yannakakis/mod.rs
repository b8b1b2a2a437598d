//! Yannakakis evaluation over a decomposition
//!
//! Every decomposition node joins the relations of its cover. The tree is
//! then reduced bottom-up by semijoins, reduced again top-down, and finally
//! joined bottom-up into the full answer relation. Any node relation that
//! becomes empty makes the query unsatisfiable.
//!
//! ```ignore
//! let mut y = Yannakakis::new(&decomp, &db, &encoding)?;
//! if let Some(answers) = y.all_answers()? {
//!     println!("{} answers", answers.len());
//! }
//! ```

mod errors;

pub use errors::{YannakakisError, YannakakisResult};

use crate::db::{join, semijoin, Database, Table};
use crate::hypergraph::{Decomp, Encoding, Node};
use crate::observability::{log_event_with_fields, Event};
use crate::stats::{join_order, MixedStatsPolicy, Statistics};

/// Working node: the input relations of one decomposition node and their join
#[derive(Debug, Clone)]
pub struct YNode {
    tables: Vec<Table>,
    join: Option<Table>,
    children: Vec<YNode>,
}

impl YNode {
    pub fn new(tables: Vec<Table>) -> Self {
        Self {
            tables,
            join: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<YNode>) -> Self {
        self.children = children;
        self
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// The node's current relation; `None` before `compute_nodes`
    pub fn join(&self) -> Option<&Table> {
        self.join.as_ref()
    }

    pub fn children(&self) -> &[YNode] {
        &self.children
    }

    fn build(node: &Node, db: &Database, encoding: &Encoding) -> YannakakisResult<Self> {
        let mut tables = Vec::with_capacity(node.cover.len());
        for edge in node.cover.iter() {
            let name = encoding.edge_name(edge.id);
            let table = db
                .get(name)
                .ok_or_else(|| YannakakisError::MissingTable(name.to_string()))?;
            tables.push(table.clone());
        }
        let children = node
            .children
            .iter()
            .map(|c| Self::build(c, db, encoding))
            .collect::<YannakakisResult<Vec<_>>>()?;
        Ok(Self::new(tables).with_children(children))
    }

    fn joined(&self) -> YannakakisResult<&Table> {
        self.join.as_ref().ok_or(YannakakisError::NotComputed)
    }

    fn joined_mut(&mut self) -> YannakakisResult<&mut Table> {
        self.join.as_mut().ok_or(YannakakisError::NotComputed)
    }

    /// Joins this node's relations; greedy order when there are more than two
    fn join_tables(&mut self) -> YannakakisResult<bool> {
        if self.join.is_none() {
            let order = self.join_sequence()?;
            let Some((&first, rest)) = order.split_first() else {
                return Err(YannakakisError::EmptyCover);
            };
            let mut acc = self.tables[first].clone();
            for &i in rest {
                if acc.is_empty() {
                    break;
                }
                acc = join(&acc, &self.tables[i])?;
            }
            self.join = Some(acc);
        }
        Ok(!self.joined()?.is_empty())
    }

    fn join_sequence(&self) -> YannakakisResult<Vec<usize>> {
        if self.tables.len() <= 2 {
            return Ok((0..self.tables.len()).collect());
        }
        let stats: Vec<Statistics> = self.tables.iter().map(Table::compute_statistics).collect();
        let inputs: Vec<&Statistics> = stats.iter().collect();
        Ok(join_order(&inputs, MixedStatsPolicy::Degrade)?.indices)
    }
}

/// Evaluates a conjunctive query along a decomposition
#[derive(Debug, Clone)]
pub struct Yannakakis {
    root: YNode,
}

impl Yannakakis {
    /// Assigns each covered edge the relation of the same name
    pub fn new(decomp: &Decomp, db: &Database, encoding: &Encoding) -> YannakakisResult<Self> {
        Ok(Self {
            root: YNode::build(&decomp.root, db, encoding)?,
        })
    }

    pub fn from_root(root: YNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &YNode {
        &self.root
    }

    /// Whether the query has at least one answer
    pub fn bool_answer(&mut self) -> YannakakisResult<bool> {
        Ok(self.compute_nodes()? && self.reduce()?)
    }

    /// Every answer over all attributes of the tree; `None` if unsatisfiable
    pub fn all_answers(&mut self) -> YannakakisResult<Option<Table>> {
        if !self.bool_answer()? {
            return Ok(None);
        }
        self.full_reduce()?;
        let answers = self.join_upwards()?;
        log_event_with_fields(Event::AnswerComplete, &[("answers", &answers.len().to_string())]);
        Ok(Some(answers))
    }

    /// Joins the relations of every node; false as soon as one join is empty
    pub fn compute_nodes(&mut self) -> YannakakisResult<bool> {
        let sat = compute_nodes(&mut self.root)?;
        if !sat {
            log_event_with_fields(Event::YannakakisUnsat, &[("phase", "compute_nodes")]);
        }
        Ok(sat)
    }

    /// Bottom-up semijoin pass; false if a node relation becomes empty
    pub fn reduce(&mut self) -> YannakakisResult<bool> {
        let sat = reduce(&mut self.root)?;
        if !sat {
            log_event_with_fields(Event::YannakakisUnsat, &[("phase", "reduce")]);
        }
        Ok(sat)
    }

    /// Top-down semijoin pass; call after a successful `reduce`
    pub fn full_reduce(&mut self) -> YannakakisResult<()> {
        full_reduce(&mut self.root)?;
        log_event_with_fields(
            Event::FullReduceComplete,
            &[("root_tuples", &self.root.joined()?.len().to_string())],
        );
        Ok(())
    }

    /// Joins every child into its parent, bottom-up; returns the root's relation
    pub fn join_upwards(&mut self) -> YannakakisResult<Table> {
        join_upwards(&mut self.root)
    }
}

fn compute_nodes(node: &mut YNode) -> YannakakisResult<bool> {
    if !node.join_tables()? {
        return Ok(false);
    }
    for child in &mut node.children {
        if !compute_nodes(child)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn reduce(node: &mut YNode) -> YannakakisResult<bool> {
    for i in 0..node.children.len() {
        if !reduce(&mut node.children[i])? {
            return Ok(false);
        }
        let YNode { join, children, .. } = &mut *node;
        let parent = join.as_mut().ok_or(YannakakisError::NotComputed)?;
        semijoin(parent, children[i].joined()?)?;
        if parent.is_empty() {
            return Ok(false);
        }
    }
    Ok(true)
}

fn full_reduce(node: &mut YNode) -> YannakakisResult<()> {
    let YNode { join, children, .. } = &mut *node;
    let parent = join.as_ref().ok_or(YannakakisError::NotComputed)?;
    for child in children.iter_mut() {
        semijoin(child.joined_mut()?, parent)?;
        full_reduce(child)?;
    }
    Ok(())
}

fn join_upwards(node: &mut YNode) -> YannakakisResult<Table> {
    let mut acc = node.joined()?.clone();
    for child in &mut node.children {
        let sub = join_upwards(child)?;
        acc = join(&acc, &sub)?;
        child.join = Some(sub);
    }
    node.join = Some(acc.clone());
    Ok(acc)
}
