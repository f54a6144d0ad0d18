//! DOT serializer.
//!
//! [`DotWriter`] walks a [`Graph`] from the root scope and writes Graphviz DOT
//! text. Output is a pure function of the graph: children are written in
//! declaration order and attributes in insertion order.
//!
//! # Layout of the output
//!
//! ```text
//! // <comment>
//! [strict] digraph <name> {
//!     graph [...]              root graph-level defaults
//!     node [...]               root node defaults
//!     edge [...]               root edge defaults
//!     a [label="Start"]        nodes at their first declaration
//!     subgraph cluster_grp {   child scopes, recursively
//!         graph [...]
//!         b [label="End"]
//!         a -> b [label="go"]
//!     }
//! }
//! ```
//!
//! Nodes and edges carry their resolved attributes, so the default
//! statements are informational for Graphviz and do not change what the
//! model resolved.

use std::fmt::{self, Write};

use dotloom_core::{
    attributes::{AttributeKind, AttributeSet},
    dot::{format_id, format_value},
    graph::{Edge, Element, Graph, ScopeIndex},
    identifier::Id,
};

const INDENT: &str = "\t";

/// Writes a [`Graph`] as DOT text.
///
/// # Examples
///
/// ```
/// use dotloom::{attrs, export::dot::DotWriter, graph::Graph, scope::ScopeAttributes};
///
/// let mut graph = Graph::digraph("G");
/// graph.node("A", attrs! { "label" => "Start" });
/// graph.subgraph("grp", true, ScopeAttributes::new(), |grp| {
///     grp.node("B", attrs! { "label" => "End" });
///     grp.edge("A", "B", attrs! { "label" => "go" });
/// });
///
/// let dot = DotWriter::new(&graph).to_string();
/// assert_eq!(
///     dot,
///     "digraph G {\n\tA [label=\"Start\"]\n\tsubgraph cluster_grp {\n\t\tB [label=\"End\"]\n\t\tA -> B [label=\"go\"]\n\t}\n}\n",
/// );
/// ```
pub struct DotWriter<'g> {
    graph: &'g Graph,
}

impl<'g> DotWriter<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Writes the whole graph to `out`.
    ///
    /// # Errors
    ///
    /// Fails only if `out` fails.
    pub fn write<W: Write>(&self, out: &mut W) -> fmt::Result {
        let graph = self.graph;

        if let Some(comment) = graph.comment() {
            for line in comment.lines() {
                writeln!(out, "// {line}")?;
            }
        }

        if graph.is_strict() {
            out.write_str("strict ")?;
        }
        out.write_str(graph.kind().keyword())?;
        if !graph.name().is_empty() {
            write!(out, " {}", format_id(graph.name()))?;
        }
        out.write_str(" {\n")?;

        self.write_scope_body(out, ScopeIndex::ROOT, 1)?;

        out.write_str("}\n")
    }

    fn write_scope_body<W: Write>(&self, out: &mut W, index: ScopeIndex, depth: usize) -> fmt::Result {
        let scope = self.graph.scope(index);

        for kind in AttributeKind::ALL {
            if let Some(defaults) = scope.defaults(kind).filter(|set| !set.is_empty()) {
                indent(out, depth)?;
                out.write_str(kind.keyword())?;
                write_attributes(out, defaults)?;
                out.write_char('\n')?;
            }
        }

        for element in scope.children() {
            match element {
                Element::Node(id) => self.write_node(out, *id, depth)?,
                Element::Edge(edge) => self.write_edge(out, edge, depth)?,
                Element::Scope(child) => self.write_subgraph(out, *child, depth)?,
            }
        }
        Ok(())
    }

    fn write_node<W: Write>(&self, out: &mut W, id: Id, depth: usize) -> fmt::Result {
        indent(out, depth)?;
        out.write_str(&format_id(&id.name()))?;
        if let Some(node) = self.graph.get_node(id) {
            write_attributes(out, node.attributes())?;
        }
        out.write_char('\n')
    }

    fn write_edge<W: Write>(&self, out: &mut W, edge: &Edge, depth: usize) -> fmt::Result {
        indent(out, depth)?;
        write!(
            out,
            "{} {} {}",
            format_id(&edge.source().name()),
            self.graph.kind().edge_op(),
            format_id(&edge.target().name()),
        )?;
        write_attributes(out, edge.attributes())?;
        out.write_char('\n')
    }

    fn write_subgraph<W: Write>(&self, out: &mut W, index: ScopeIndex, depth: usize) -> fmt::Result {
        indent(out, depth)?;
        match self.graph.scope(index).block_name() {
            Some(name) => writeln!(out, "subgraph {} {{", format_id(&name))?,
            None => out.write_str("subgraph {\n")?,
        }
        self.write_scope_body(out, index, depth + 1)?;
        indent(out, depth)?;
        out.write_str("}\n")
    }
}

impl fmt::Display for DotWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f)
    }
}

/// Serializes `graph` into a new string.
///
/// # Errors
///
/// Returns [`fmt::Error`] if writing into the buffer fails.
pub fn to_dot(graph: &Graph) -> Result<String, fmt::Error> {
    let mut out = String::new();
    DotWriter::new(graph).write(&mut out)?;
    Ok(out)
}

fn indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}

/// Writes ` [k=v k=v]`, or nothing for an empty set.
fn write_attributes<W: Write>(out: &mut W, attributes: &AttributeSet) -> fmt::Result {
    if attributes.is_empty() {
        return Ok(());
    }
    out.write_str(" [")?;
    for (i, (key, value)) in attributes.iter().enumerate() {
        if i > 0 {
            out.write_char(' ')?;
        }
        write!(out, "{}={}", format_id(key), format_value(key, value))?;
    }
    out.write_char(']')
}
