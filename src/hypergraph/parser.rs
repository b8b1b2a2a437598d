//! HyperBench hypergraph parser
//!
//! Accepted syntax:
//!
//! ```text
//! % comment until end of line
//! e1(a, b, c),
//! e2(c, d).
//! ```
//!
//! Edges are separated by `,`; a trailing `.` is optional. Names may contain
//! any character except whitespace, `(`, `)`, `,` and `%`.

use std::collections::HashMap;

use super::errors::{HypergraphError, HypergraphResult};
use super::graph::{Edge, EdgeId, Hypergraph};
use super::vertices::Vertex;

/// Bidirectional mapping between names and dense ids
#[derive(Debug, Clone, Default)]
pub struct Encoding {
    edge_names: Vec<String>,
    vertex_names: Vec<String>,
    edge_ids: HashMap<String, EdgeId>,
    vertex_ids: HashMap<String, Vertex>,
}

impl Encoding {
    pub fn edge_name(&self, id: EdgeId) -> &str {
        self.edge_names.get(id).map(String::as_str).unwrap_or("?")
    }

    pub fn vertex_name(&self, v: Vertex) -> &str {
        self.vertex_names.get(v).map(String::as_str).unwrap_or("?")
    }

    pub fn edge_id(&self, name: &str) -> Option<EdgeId> {
        self.edge_ids.get(name).copied()
    }

    pub fn vertex_id(&self, name: &str) -> Option<Vertex> {
        self.vertex_ids.get(name).copied()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_names.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_names.len()
    }

    /// Names of the given vertices, in the given order
    pub fn vertex_names(&self, vertices: &[Vertex]) -> Vec<String> {
        vertices
            .iter()
            .map(|v| self.vertex_name(*v).to_string())
            .collect()
    }

    /// Registers a vertex name, returning its id (existing or fresh)
    pub fn intern_vertex(&mut self, name: &str) -> Vertex {
        if let Some(&v) = self.vertex_ids.get(name) {
            return v;
        }
        let v = self.vertex_names.len();
        self.vertex_names.push(name.to_string());
        self.vertex_ids.insert(name.to_string(), v);
        v
    }

    fn intern_edge(&mut self, name: &str) -> HypergraphResult<EdgeId> {
        if self.edge_ids.contains_key(name) {
            return Err(HypergraphError::DuplicateEdge(name.to_string()));
        }
        let id = self.edge_names.len();
        self.edge_names.push(name.to_string());
        self.edge_ids.insert(name.to_string(), id);
        Ok(id)
    }
}

/// A parsed hypergraph together with its name encoding
#[derive(Debug, Clone)]
pub struct ParsedGraph {
    pub graph: Hypergraph,
    pub encoding: Encoding,
}

/// Parses HyperBench text into a hypergraph
pub fn parse(text: &str) -> HypergraphResult<ParsedGraph> {
    let mut encoding = Encoding::default();
    let mut edges = Vec::new();

    let mut scanner = Scanner::new(text);
    loop {
        scanner.skip_blank();
        if scanner.at_end() {
            break;
        }

        let name = scanner.name()?;
        scanner.expect('(')?;
        let mut members = Vec::new();
        loop {
            scanner.skip_blank();
            if scanner.peek() == Some(')') {
                break;
            }
            let vertex = scanner.name()?;
            members.push(encoding.intern_vertex(&vertex));
            scanner.skip_blank();
            match scanner.peek() {
                Some(',') => scanner.bump(),
                Some(')') => break,
                _ => return Err(scanner.malformed("expected ',' or ')' in vertex list")),
            }
        }
        scanner.expect(')')?;
        if members.is_empty() {
            return Err(scanner.malformed(format!("edge '{}' has no vertices", name)));
        }

        let id = encoding.intern_edge(&name)?;
        edges.push(Edge::new(id, members));

        scanner.skip_blank();
        match scanner.peek() {
            Some(',') => scanner.bump(),
            Some('.') => {
                scanner.bump();
                scanner.skip_blank();
                if !scanner.at_end() {
                    return Err(scanner.malformed("unexpected input after final '.'"));
                }
            }
            None => {}
            Some(c) => return Err(scanner.malformed(format!("unexpected '{}' after edge", c))),
        }
    }

    if edges.is_empty() {
        return Err(HypergraphError::Empty);
    }

    Ok(ParsedGraph {
        graph: Hypergraph::new(edges),
        encoding,
    })
}

struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) {
        if self.chars.next() == Some('\n') {
            self.line += 1;
        }
    }

    fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Skips whitespace and `%` comments
    fn skip_blank(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '%' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn name(&mut self) -> HypergraphResult<String> {
        self.skip_blank();
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | ',' | '%') {
                break;
            }
            out.push(c);
            self.bump();
        }
        if out.is_empty() {
            return Err(self.malformed("expected a name"));
        }
        Ok(out)
    }

    fn expect(&mut self, want: char) -> HypergraphResult<()> {
        self.skip_blank();
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            _ => Err(self.malformed(format!("expected '{}'", want))),
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> HypergraphError {
        HypergraphError::Malformed {
            line: self.line,
            reason: reason.into(),
        }
    }
}
