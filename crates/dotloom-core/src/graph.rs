//! The root of a diagram: scope arena, flat node registry and edges.
//!
//! # Architecture
//!
//! A [`Graph`] owns every [`Scope`] in an arena addressed by [`ScopeIndex`];
//! index `0` is the root. Each scope owns its ordered [`Element`]s, and child
//! scopes appear there as indices. The parent link stored in a scope is only
//! used to resolve cascading defaults.
//!
//! Node identifiers live in one flat registry no matter how deeply they are
//! declared, so a node mentioned in two subgraphs is one logical node:
//!
//! - The first declaration fixes where the node is emitted.
//! - Every declaration resolves its attributes against its own scope, and the
//!   result is layered over what the node already had (last write wins per key).
//!
//! Edges are never deduplicated and their endpoints are not checked; an
//! undeclared endpoint becomes an implicit node when Graphviz reads the graph.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};

use crate::{
    attributes::{AttributeKind, AttributeSet},
    identifier::Id,
    scope::{Scope, ScopeAttributes, ScopeGuard, ScopeMut},
};

/// Whether edges are directed (`digraph`, `->`) or not (`graph`, `--`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphKind {
    #[default]
    Directed,
    Undirected,
}

impl GraphKind {
    /// The DOT keyword opening the graph.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Directed => "digraph",
            Self::Undirected => "graph",
        }
    }

    /// The DOT edge operator.
    pub fn edge_op(&self) -> &'static str {
        match self {
            Self::Directed => "->",
            Self::Undirected => "--",
        }
    }
}

/// Index of a [`Scope`] inside its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeIndex(usize);

impl ScopeIndex {
    /// The root scope of every graph.
    pub const ROOT: ScopeIndex = ScopeIndex(0);
}

/// A logical node in the flat registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    attributes: AttributeSet,
    scope: ScopeIndex,
}

impl Node {
    pub fn id(&self) -> Id {
        self.id
    }

    /// Resolved attributes, including every amendment.
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Scope of the first declaration, where the node statement is emitted.
    pub fn scope(&self) -> ScopeIndex {
        self.scope
    }
}

/// A directed (or undirected) connection between two identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    attributes: AttributeSet,
}

impl Edge {
    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    /// Resolved attributes.
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }
}

/// A child of a scope, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// First declaration of a node; look it up with [`Graph::get_node`].
    Node(Id),
    Edge(Edge),
    Scope(ScopeIndex),
}

/// A complete diagram.
///
/// # Examples
///
/// ```
/// use dotloom_core::{attrs, attributes::AttributeKind, graph::Graph};
///
/// let mut graph = Graph::digraph("Data_Flow").with_comment("Complete Data Flow");
/// graph.attr(AttributeKind::Node, attrs! { "shape" => "box" });
///
/// let input = graph.node("input", attrs! { "label" => "User Input" });
/// let llm = graph.node("llm_gen", attrs! { "label" => "LLM" });
/// graph.edge(input, llm, attrs! { "label" => "images[]" });
///
/// assert_eq!(graph.get_node(input).unwrap().attributes().get("shape"), Some("box"));
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    kind: GraphKind,
    strict: bool,
    comment: Option<String>,
    scopes: Vec<Scope>,
    nodes: IndexMap<Id, Node>,
    clusters: HashSet<String>,
}

impl Graph {
    /// Creates an empty graph of the given kind. An empty name is allowed.
    pub fn new(kind: GraphKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            strict: false,
            comment: None,
            scopes: vec![Scope::new(name.into(), false, None, ScopeAttributes::new())],
            nodes: IndexMap::new(),
            clusters: HashSet::new(),
        }
    }

    /// Creates an empty directed graph.
    pub fn digraph(name: impl Into<String>) -> Self {
        Self::new(GraphKind::Directed, name)
    }

    /// Creates an empty undirected graph.
    pub fn undirected(name: impl Into<String>) -> Self {
        Self::new(GraphKind::Undirected, name)
    }

    /// Sets the comment emitted as the first line of the description.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Marks the graph `strict`, which makes Graphviz merge parallel edges.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn name(&self) -> &str {
        self.root().name()
    }

    /// Returns the root scope.
    pub fn root(&self) -> &Scope {
        &self.scopes[ScopeIndex::ROOT.0]
    }

    /// Returns the scope for `index`.
    ///
    /// # Panics
    /// Panics if `index` was not produced by this graph.
    pub fn scope(&self, index: ScopeIndex) -> &Scope {
        &self.scopes[index.0]
    }

    /// Returns the logical node registered under `id`.
    pub fn get_node(&self, id: impl Into<Id>) -> Option<&Node> {
        self.nodes.get(&id.into())
    }

    /// Iterates over logical nodes in first-declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over edges in document order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        let mut edges = Vec::new();
        self.collect_edges(ScopeIndex::ROOT, &mut edges);
        edges.into_iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Identifiers used as edge endpoints but never declared as nodes, in
    /// order of first use.
    pub fn undeclared_endpoints(&self) -> Vec<Id> {
        let mut undeclared = IndexSet::new();
        for edge in self.edges() {
            for id in [edge.source, edge.target] {
                if !self.nodes.contains_key(&id) {
                    undeclared.insert(id);
                }
            }
        }
        undeclared.into_iter().collect()
    }

    /// Returns a builder handle for the root scope.
    pub fn root_mut(&mut self) -> ScopeMut<'_> {
        ScopeMut::new(self, ScopeIndex::ROOT)
    }

    /// Declares or amends a node in the root scope.
    pub fn node(&mut self, id: impl Into<Id>, attrs: AttributeSet) -> Id {
        self.declare_node(ScopeIndex::ROOT, id.into(), &attrs)
    }

    /// Appends an edge to the root scope.
    pub fn edge(&mut self, source: impl Into<Id>, target: impl Into<Id>, attrs: AttributeSet) {
        self.declare_edge(ScopeIndex::ROOT, source.into(), target.into(), &attrs);
    }

    /// Amends the root scope's defaults for `kind`.
    pub fn attr(&mut self, kind: AttributeKind, attrs: AttributeSet) -> &mut Self {
        self.scopes[ScopeIndex::ROOT.0].amend_defaults(kind, attrs);
        self
    }

    /// Sets a single graph-level attribute on the root scope.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attr(AttributeKind::Graph, AttributeSet::new().with(key, value))
    }

    /// Opens a child scope of the root. See [`ScopeMut::scoped`].
    pub fn scoped(
        &mut self,
        name: impl Into<String>,
        cluster: bool,
        attrs: ScopeAttributes,
    ) -> ScopeGuard<'_> {
        ScopeGuard::open(self, ScopeIndex::ROOT, name.into(), cluster, attrs)
    }

    /// Populates a child scope of the root. See [`ScopeMut::subgraph`].
    pub fn subgraph<T>(
        &mut self,
        name: impl Into<String>,
        cluster: bool,
        attrs: ScopeAttributes,
        build: impl FnOnce(&mut ScopeMut<'_>) -> T,
    ) -> T {
        let mut guard = self.scoped(name, cluster, attrs);
        build(&mut *guard)
    }

    /// Resolves the effective attributes of an element of `kind` declared in
    /// `scope`: the nearest default set for `kind`, starting at `scope` and
    /// walking up, merged with `explicit`. Farther ancestors are not consulted.
    pub fn resolve(
        &self,
        scope: ScopeIndex,
        kind: AttributeKind,
        explicit: &AttributeSet,
    ) -> AttributeSet {
        let mut current = Some(scope);
        while let Some(index) = current {
            let scope = &self.scopes[index.0];
            if let Some(defaults) = scope.defaults(kind) {
                return defaults.merge(explicit);
            }
            current = scope.parent();
        }
        explicit.clone()
    }

    pub(crate) fn scope_mut(&mut self, index: ScopeIndex) -> &mut Scope {
        &mut self.scopes[index.0]
    }

    pub(crate) fn push_scope(
        &mut self,
        parent: ScopeIndex,
        name: String,
        cluster: bool,
        attrs: ScopeAttributes,
    ) -> ScopeIndex {
        let scope = Scope::new(name, cluster, Some(parent), attrs);
        if scope.is_cluster() {
            let block = scope.block_name().unwrap_or_default().into_owned();
            if !self.clusters.insert(block.clone()) {
                warn!(cluster = block; "Duplicate cluster name; Graphviz will merge these blocks");
            }
        }
        self.scopes.push(scope);
        ScopeIndex(self.scopes.len() - 1)
    }

    pub(crate) fn attach_scope(&mut self, parent: ScopeIndex, child: ScopeIndex) {
        self.scopes[parent.0].push_child(Element::Scope(child));
    }

    pub(crate) fn declare_node(&mut self, scope: ScopeIndex, id: Id, explicit: &AttributeSet) -> Id {
        let resolved = self.resolve(scope, AttributeKind::Node, explicit);

        if let Some(node) = self.nodes.get_mut(&id) {
            debug!(node = id.to_string(); "Amending existing node");
            node.attributes.extend(resolved.iter());
        } else {
            self.nodes.insert(
                id,
                Node {
                    id,
                    attributes: resolved,
                    scope,
                },
            );
            self.scopes[scope.0].push_child(Element::Node(id));
        }
        id
    }

    pub(crate) fn declare_edge(
        &mut self,
        scope: ScopeIndex,
        source: Id,
        target: Id,
        explicit: &AttributeSet,
    ) {
        let attributes = self.resolve(scope, AttributeKind::Edge, explicit);
        self.scopes[scope.0].push_child(Element::Edge(Edge {
            source,
            target,
            attributes,
        }));
    }

    fn collect_edges<'a>(&'a self, index: ScopeIndex, edges: &mut Vec<&'a Edge>) {
        for element in self.scopes[index.0].children() {
            match element {
                Element::Edge(edge) => edges.push(edge),
                Element::Scope(child) => self.collect_edges(*child, edges),
                Element::Node(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    #[test]
    fn test_new_graph_is_empty() {
        let graph = Graph::digraph("empty");

        assert_eq!(graph.name(), "empty");
        assert_eq!(graph.kind(), GraphKind::Directed);
        assert!(!graph.is_strict());
        assert_eq!(graph.comment(), None);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.root().children().is_empty());
        assert_eq!(graph.root().parent(), None);
    }

    #[test]
    fn test_kind_tokens() {
        assert_eq!(GraphKind::Directed.keyword(), "digraph");
        assert_eq!(GraphKind::Directed.edge_op(), "->");
        assert_eq!(GraphKind::Undirected.keyword(), "graph");
        assert_eq!(GraphKind::Undirected.edge_op(), "--");
    }

    #[test]
    fn test_root_defaults_apply_to_root_nodes() {
        let mut graph = Graph::digraph("g");
        graph.attr(AttributeKind::Node, attrs! { "shape" => "box", "fillcolor" => "A" });

        let id = graph.node("a", attrs! { "label" => "Start" });

        let node = graph.get_node(id).unwrap();
        assert_eq!(node.attributes().get("shape"), Some("box"));
        assert_eq!(node.attributes().get("fillcolor"), Some("A"));
        assert_eq!(node.attributes().get("label"), Some("Start"));
        assert_eq!(node.scope(), ScopeIndex::ROOT);
    }

    #[test]
    fn test_explicit_over_default() {
        let mut graph = Graph::digraph("g");
        graph.subgraph(
            "inner",
            false,
            ScopeAttributes::new().node(attrs! { "fillcolor" => "B" }),
            |inner| {
                inner.node("n", attrs! { "fillcolor" => "C" });
            },
        );

        assert_eq!(graph.get_node("n").unwrap().attributes().get("fillcolor"), Some("C"));
    }

    #[test]
    fn test_cascade_nearest_wins() {
        let mut graph = Graph::digraph("g");
        graph.attr(AttributeKind::Node, attrs! { "fillcolor" => "A", "shape" => "box" });
        graph.subgraph(
            "inner",
            true,
            ScopeAttributes::new().node(attrs! { "fillcolor" => "B" }),
            |inner| {
                inner.node("n", attrs! {});
            },
        );

        let resolved = graph.get_node("n").unwrap().attributes();
        assert_eq!(resolved, &attrs! { "fillcolor" => "B" });
    }

    #[test]
    fn test_cascade_skips_scopes_without_defaults() {
        let mut graph = Graph::digraph("g");
        graph.attr(AttributeKind::Edge, attrs! { "color" => "#2c3e50" });
        graph.subgraph("outer", true, ScopeAttributes::new(), |outer| {
            outer.subgraph("inner", true, ScopeAttributes::new(), |inner| {
                inner.edge("a", "b", attrs! { "label" => "go" });
            });
        });

        let edge = graph.edges().next().unwrap();
        assert_eq!(
            edge.attributes(),
            &attrs! { "color" => "#2c3e50", "label" => "go" }
        );
    }

    #[test]
    fn test_defaults_amended_later_do_not_touch_earlier_nodes() {
        let mut graph = Graph::digraph("g");
        graph.node("early", attrs! {});
        graph.attr(AttributeKind::Node, attrs! { "shape" => "box" });
        graph.node("late", attrs! {});

        assert!(graph.get_node("early").unwrap().attributes().is_empty());
        assert_eq!(graph.get_node("late").unwrap().attributes().get("shape"), Some("box"));
    }

    #[test]
    fn test_redeclaration_amends_one_logical_node() {
        let mut graph = Graph::digraph("g");
        graph.subgraph("first", true, ScopeAttributes::new(), |first| {
            first.node("shared", attrs! { "label" => "One", "shape" => "box" });
        });
        graph.subgraph("second", true, ScopeAttributes::new(), |second| {
            second.node("shared", attrs! { "label" => "Two" });
        });

        assert_eq!(graph.node_count(), 1);
        let node = graph.get_node("shared").unwrap();
        assert_eq!(node.attributes().get("label"), Some("Two"));
        assert_eq!(node.attributes().get("shape"), Some("box"));

        // Emitted only where it was first declared.
        let first = graph.scope(node.scope());
        assert_eq!(first.name(), "first");
        let second_index = match &graph.root().children()[1] {
            Element::Scope(index) => *index,
            other => panic!("expected scope, got {other:?}"),
        };
        assert!(graph.scope(second_index).children().is_empty());
    }

    #[test]
    fn test_edges_are_not_deduplicated() {
        let mut graph = Graph::digraph("g");
        graph.edge("a", "b", attrs! { "label" => "query" });
        graph.edge("a", "b", attrs! { "label" => "query" });

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.root().children().len(), 2);
    }

    #[test]
    fn test_undeclared_endpoints() {
        let mut graph = Graph::digraph("g");
        graph.node("a", attrs! {});
        graph.edge("a", "ghost", attrs! {});
        graph.subgraph("c", true, ScopeAttributes::new(), |c| {
            c.edge("phantom", "ghost", attrs! {});
        });

        let undeclared = graph.undeclared_endpoints();
        assert_eq!(undeclared, vec![Id::new("ghost"), Id::new("phantom")]);
    }

    #[test]
    fn test_edges_in_document_order() {
        let mut graph = Graph::digraph("g");
        graph.edge("a", "b", attrs! {});
        graph.subgraph("c", true, ScopeAttributes::new(), |c| {
            c.edge("b", "c", attrs! {});
        });
        graph.edge("c", "d", attrs! {});

        let pairs: Vec<_> = graph
            .edges()
            .map(|edge| (edge.source().name(), edge.target().name()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "c".to_string()),
                ("c".to_string(), "d".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicate_cluster_names_are_accepted() {
        let mut graph = Graph::digraph("g");
        graph.subgraph("twin", true, ScopeAttributes::new(), |_| {});
        graph.subgraph("twin", true, ScopeAttributes::new(), |_| {});

        assert_eq!(graph.root().children().len(), 2);
    }

    #[test]
    fn test_comment_and_strict() {
        let graph = Graph::undirected("u")
            .with_comment("System Architecture")
            .with_strict(true);

        assert_eq!(graph.kind(), GraphKind::Undirected);
        assert!(graph.is_strict());
        assert_eq!(graph.comment(), Some("System Architecture"));
    }
}
