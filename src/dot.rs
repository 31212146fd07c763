//! Graph descriptions in DOT (Graphviz) format.
//!
//! A [`Snapshot`] is a plain list of statements, written out in insertion order.
//! Graphviz merges repeated statements for the same node or edge of a `strict`
//! graph, later attributes overriding earlier ones. Snapshots rely on this: the
//! structure is declared once with base attributes, then a styling block restyles
//! single elements. [`Snapshot::node_attrs`] and [`Snapshot::edge_attrs`] resolve
//! attributes the same way.
//!
//! # Examples
//!
//! ```
//! use tdvisu_rs::dot::{Attrs, GraphKind, Snapshot};
//!
//! let mut snapshot = Snapshot::new(GraphKind::Digraph, "example").strict(true);
//! snapshot.node("a", Attrs::new().with("shape", "box"));
//! snapshot.edge("a", "b", Attrs::new());
//! snapshot.node("a", Attrs::new().with("fillcolor", "yellow"));
//!
//! assert_eq!(snapshot.node_attrs("a").get("shape"), Some("box"));
//! assert_eq!(snapshot.node_attrs("a").get("fillcolor"), Some("yellow"));
//! assert!(snapshot.to_dot().starts_with("strict digraph \"example\" {"));
//! ```

use std::fmt;

/// Directed or undirected graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GraphKind {
    Graph,
    Digraph,
}

impl GraphKind {
    fn keyword(self) -> &'static str {
        match self {
            GraphKind::Graph => "graph",
            GraphKind::Digraph => "digraph",
        }
    }

    fn edge_op(self) -> &'static str {
        match self {
            GraphKind::Graph => "--",
            GraphKind::Digraph => "->",
        }
    }
}

/// An attribute value: a quoted string or an HTML-like label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Plain(String),
    /// Written between `<` and `>` without escaping.
    Html(String),
}

impl AttrValue {
    pub fn as_str(&self) -> &str {
        match self {
            AttrValue::Plain(s) | AttrValue::Html(s) => s,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Plain(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Plain(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        AttrValue::Plain(value.clone())
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Plain(value.to_string())
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Plain(value.to_string())
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Plain(s) => write_quoted(f, s),
            AttrValue::Html(s) => write!(f, "<{}>", s),
        }
    }
}

/// Ordered attribute list. Setting a key twice keeps the last value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attrs(Vec<(String, AttrValue)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an attribute.
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<AttrValue>) {
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn merge(&mut self, other: &Attrs) {
        for (k, v) in other.0.iter() {
            self.set(k, v.clone());
        }
    }
}

impl fmt::Display for Attrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        write!(f, "]")
    }
}

/// One DOT statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `graph [...]`
    GraphAttrs(Attrs),
    /// `node [...]`
    NodeDefaults(Attrs),
    /// `edge [...]`
    EdgeDefaults(Attrs),
    Node { id: String, attrs: Attrs },
    Edge { from: String, to: String, attrs: Attrs },
    Subgraph { name: String, statements: Vec<Statement> },
}

/// A complete, self-contained graph description.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    name: String,
    kind: GraphKind,
    strict: bool,
    statements: Vec<Statement>,
}

impl Snapshot {
    pub fn new(kind: GraphKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            strict: false,
            statements: Vec::new(),
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn graph_attrs(&mut self, attrs: Attrs) {
        self.push(Statement::GraphAttrs(attrs));
    }

    pub fn node_defaults(&mut self, attrs: Attrs) {
        self.push(Statement::NodeDefaults(attrs));
    }

    pub fn edge_defaults(&mut self, attrs: Attrs) {
        self.push(Statement::EdgeDefaults(attrs));
    }

    pub fn node(&mut self, id: impl Into<String>, attrs: Attrs) {
        self.push(Statement::Node { id: id.into(), attrs });
    }

    pub fn edge(&mut self, from: impl Into<String>, to: impl Into<String>, attrs: Attrs) {
        self.push(Statement::Edge {
            from: from.into(),
            to: to.into(),
            attrs,
        });
    }

    pub fn subgraph(&mut self, name: impl Into<String>, statements: Vec<Statement>) {
        self.push(Statement::Subgraph {
            name: name.into(),
            statements,
        });
    }

    /// Renders the snapshot as DOT text.
    pub fn to_dot(&self) -> String {
        self.to_string()
    }

    /// Explicit attributes of node `id`, merged over all its statements.
    ///
    /// Defaults set with `node [...]` are not included.
    pub fn node_attrs(&self, id: &str) -> Attrs {
        let mut result = Attrs::new();
        visit(&self.statements, &mut |statement| {
            if let Statement::Node { id: node, attrs } = statement {
                if node == id {
                    result.merge(attrs);
                }
            }
        });
        result
    }

    /// Explicit attributes of the edge between `from` and `to`, merged over all its
    /// statements. Undirected graphs match both orientations.
    pub fn edge_attrs(&self, from: &str, to: &str) -> Attrs {
        let mut result = Attrs::new();
        visit(&self.statements, &mut |statement| {
            if let Statement::Edge { from: a, to: b, attrs } = statement {
                if self.same_edge((a.as_str(), b.as_str()), (from, to)) {
                    result.merge(attrs);
                }
            }
        });
        result
    }

    /// Whether a node statement for `id` exists.
    pub fn has_node(&self, id: &str) -> bool {
        let mut found = false;
        visit(&self.statements, &mut |statement| {
            found |= matches!(statement, Statement::Node { id: node, .. } if node == id);
        });
        found
    }

    /// Whether an edge statement between `from` and `to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        let mut found = false;
        visit(&self.statements, &mut |statement| {
            if let Statement::Edge { from: a, to: b, .. } = statement {
                found |= self.same_edge((a.as_str(), b.as_str()), (from, to));
            }
        });
        found
    }

    /// Distinct node ids with a node statement, in order of first declaration.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut result: Vec<&str> = Vec::new();
        visit(&self.statements, &mut |statement| {
            if let Statement::Node { id, .. } = statement {
                if !result.contains(&id.as_str()) {
                    result.push(id.as_str());
                }
            }
        });
        result
    }

    /// Distinct edges (by endpoints), in order of first declaration.
    pub fn edge_ids(&self) -> Vec<(&str, &str)> {
        let mut result: Vec<(&str, &str)> = Vec::new();
        visit(&self.statements, &mut |statement| {
            if let Statement::Edge { from, to, .. } = statement {
                let edge = (from.as_str(), to.as_str());
                if !result.iter().any(|&other| self.same_edge(other, edge)) {
                    result.push(edge);
                }
            }
        });
        result
    }

    fn same_edge(&self, (a, b): (&str, &str), (from, to): (&str, &str)) -> bool {
        (a == from && b == to) || (self.kind == GraphKind::Graph && a == to && b == from)
    }
}

fn visit<'a>(statements: &'a [Statement], f: &mut impl FnMut(&'a Statement)) {
    for statement in statements.iter() {
        if let Statement::Subgraph { statements, .. } = statement {
            visit(statements, f);
        } else {
            f(statement);
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strict {
            write!(f, "strict ")?;
        }
        write!(f, "{} ", self.kind.keyword())?;
        write_quoted(f, &self.name)?;
        writeln!(f, " {{")?;
        write_statements(f, self.kind, &self.statements, 1)?;
        writeln!(f, "}}")
    }
}

fn write_statements(
    f: &mut fmt::Formatter<'_>,
    kind: GraphKind,
    statements: &[Statement],
    depth: usize,
) -> fmt::Result {
    let indent = "\t".repeat(depth);
    for statement in statements.iter() {
        write!(f, "{}", indent)?;
        match statement {
            Statement::GraphAttrs(attrs) => writeln!(f, "graph {}", attrs)?,
            Statement::NodeDefaults(attrs) => writeln!(f, "node {}", attrs)?,
            Statement::EdgeDefaults(attrs) => writeln!(f, "edge {}", attrs)?,
            Statement::Node { id, attrs } => {
                write_quoted(f, id)?;
                if !attrs.is_empty() {
                    write!(f, " {}", attrs)?;
                }
                writeln!(f)?;
            }
            Statement::Edge { from, to, attrs } => {
                write_quoted(f, from)?;
                write!(f, " {} ", kind.edge_op())?;
                write_quoted(f, to)?;
                if !attrs.is_empty() {
                    write!(f, " {}", attrs)?;
                }
                writeln!(f)?;
            }
            Statement::Subgraph { name, statements } => {
                write!(f, "subgraph ")?;
                write_quoted(f, name)?;
                writeln!(f, " {{")?;
                write_statements(f, kind, statements, depth + 1)?;
                writeln!(f, "{}}}", indent)?;
            }
        }
    }
    Ok(())
}

/// Writes `s` as a double-quoted DOT string.
///
/// Only quotes are escaped, backslashes are passed through so that escape
/// sequences of record labels survive. A trailing lone backslash is doubled.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        if c == '"' {
            write!(f, "\\\"")?;
        } else {
            write!(f, "{}", c)?;
        }
    }
    let trailing = s.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        write!(f, "\\")?;
    }
    write!(f, "\"")
}

/// Escapes text for use inside an HTML-like label.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// HTML-like label of a bag: the head on a coloured row, an empty anchor row
/// (port `anchor`) for edges, and one row per label.
pub fn bag_label<S: AsRef<str>>(head: &str, labels: &[S], head_color: &str) -> AttrValue {
    let mut result = format!(
        "<TABLE BORDER=\"0\" CELLBORDER=\"0\" CELLSPACING=\"0\"><TR><TD BGCOLOR=\"{}\">{}</TD></TR><TR><TD PORT=\"anchor\"></TD></TR>",
        escape_html(head_color),
        escape_html(head)
    );
    for label in labels.iter() {
        result.push_str("<TR><TD>");
        result.push_str(&escape_html(label.as_ref()));
        result.push_str("</TD></TR>");
    }
    result.push_str("</TABLE>");
    AttrValue::Html(result)
}
