//! Scopes: the root graph, subgraphs and clusters.
//!
//! # Overview
//!
//! - [`Scope`]: Read-only view of one scope in a [`Graph`]: its name, cluster
//!   flag, default attribute sets and ordered children.
//! - [`ScopeAttributes`]: The graph / node / edge default sets a scope may supply.
//! - [`ScopeMut`]: Builder handle used to declare nodes, edges and child scopes.
//! - [`ScopeGuard`]: A child scope being populated. Dropping the guard attaches
//!   the child to its parent, so the child is registered exactly once on every
//!   exit path, including early returns and unwinding panics.
//!
//! # Example
//!
//! ```
//! use dotloom_core::{attrs, graph::Graph, scope::ScopeAttributes};
//!
//! let mut graph = Graph::digraph("pipeline");
//! {
//!     let mut storage = graph.scoped(
//!         "storage",
//!         true,
//!         ScopeAttributes::new().graph(attrs! { "label" => "SwiftData Storage" }),
//!     );
//!     storage.node("mgr", attrs! { "label" => "StorageManager" });
//! } // attached to the root here
//!
//! assert_eq!(graph.root().children().len(), 1);
//! ```

use std::{
    borrow::Cow,
    ops::{Deref, DerefMut},
};

use crate::{
    attributes::{AttributeKind, AttributeSet},
    graph::{Element, Graph, ScopeIndex},
    identifier::Id,
};

/// Default attribute sets supplied by a scope, one per [`AttributeKind`].
///
/// `None` means the scope supplies nothing for that kind and the cascade keeps
/// looking at its ancestors. `Some` (even when empty) shadows every ancestor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeAttributes {
    graph: Option<AttributeSet>,
    node: Option<AttributeSet>,
    edge: Option<AttributeSet>,
}

impl ScopeAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the graph-level attributes (label, style, color of a cluster, ...).
    pub fn graph(mut self, attrs: AttributeSet) -> Self {
        self.graph = Some(attrs);
        self
    }

    /// Sets the node defaults.
    pub fn node(mut self, attrs: AttributeSet) -> Self {
        self.node = Some(attrs);
        self
    }

    /// Sets the edge defaults.
    pub fn edge(mut self, attrs: AttributeSet) -> Self {
        self.edge = Some(attrs);
        self
    }

    /// Returns the set supplied for `kind`, if any.
    pub fn get(&self, kind: AttributeKind) -> Option<&AttributeSet> {
        self.slot(kind).as_ref()
    }

    /// Layers `attrs` over the set for `kind`, creating it if absent.
    pub fn amend(&mut self, kind: AttributeKind, attrs: AttributeSet) {
        self.slot_mut(kind)
            .get_or_insert_with(AttributeSet::new)
            .extend(attrs.iter());
    }

    fn slot(&self, kind: AttributeKind) -> &Option<AttributeSet> {
        match kind {
            AttributeKind::Graph => &self.graph,
            AttributeKind::Node => &self.node,
            AttributeKind::Edge => &self.edge,
        }
    }

    fn slot_mut(&mut self, kind: AttributeKind) -> &mut Option<AttributeSet> {
        match kind {
            AttributeKind::Graph => &mut self.graph,
            AttributeKind::Node => &mut self.node,
            AttributeKind::Edge => &mut self.edge,
        }
    }
}

/// One scope of a [`Graph`].
#[derive(Debug, Clone)]
pub struct Scope {
    name: String,
    cluster: bool,
    parent: Option<ScopeIndex>,
    defaults: ScopeAttributes,
    children: Vec<Element>,
}

impl Scope {
    pub(crate) fn new(
        name: String,
        cluster: bool,
        parent: Option<ScopeIndex>,
        defaults: ScopeAttributes,
    ) -> Self {
        // Graphviz boxes any subgraph whose name starts with "cluster".
        let cluster = cluster || (parent.is_some() && name.starts_with("cluster"));
        Self {
            name,
            cluster,
            parent,
            defaults,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_cluster(&self) -> bool {
        self.cluster
    }

    /// Parent scope; `None` for the root.
    pub fn parent(&self) -> Option<ScopeIndex> {
        self.parent
    }

    /// Default set supplied by this scope for `kind`.
    pub fn defaults(&self, kind: AttributeKind) -> Option<&AttributeSet> {
        self.defaults.get(kind)
    }

    /// Children in declaration order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Identifier of the `subgraph` block.
    ///
    /// Clusters get a `cluster_` prefix unless the name already starts with
    /// `cluster`. Returns `None` for an anonymous, non-cluster subgraph.
    ///
    /// ```
    /// use dotloom_core::{graph::Graph, scope::ScopeAttributes};
    ///
    /// let mut graph = Graph::digraph("g");
    /// let block = graph
    ///     .scoped("gen", true, ScopeAttributes::new())
    ///     .scope()
    ///     .block_name()
    ///     .map(|name| name.into_owned());
    /// assert_eq!(block.as_deref(), Some("cluster_gen"));
    /// ```
    pub fn block_name(&self) -> Option<Cow<'_, str>> {
        if self.cluster {
            if self.name.starts_with("cluster") {
                Some(Cow::Borrowed(&self.name))
            } else {
                Some(Cow::Owned(format!("cluster_{}", self.name)))
            }
        } else if self.name.is_empty() {
            None
        } else {
            Some(Cow::Borrowed(&self.name))
        }
    }

    pub(crate) fn amend_defaults(&mut self, kind: AttributeKind, attrs: AttributeSet) {
        self.defaults.amend(kind, attrs);
    }

    pub(crate) fn push_child(&mut self, element: Element) {
        self.children.push(element);
    }
}

/// Builder handle for one scope of a graph.
pub struct ScopeMut<'g> {
    graph: &'g mut Graph,
    index: ScopeIndex,
}

impl<'g> ScopeMut<'g> {
    pub(crate) fn new(graph: &'g mut Graph, index: ScopeIndex) -> Self {
        Self { graph, index }
    }

    pub fn index(&self) -> ScopeIndex {
        self.index
    }

    /// Read-only view of the scope being built.
    pub fn scope(&self) -> &Scope {
        self.graph.scope(self.index)
    }

    /// Declares a node, or amends it if the identifier is already registered
    /// anywhere in the graph. Never fails.
    ///
    /// The attributes recorded for this declaration are the nearest node
    /// defaults merged with `attrs`.
    pub fn node(&mut self, id: impl Into<Id>, attrs: AttributeSet) -> Id {
        self.graph.declare_node(self.index, id.into(), &attrs)
    }

    /// Appends an edge. Endpoints are not required to be declared.
    pub fn edge(&mut self, source: impl Into<Id>, target: impl Into<Id>, attrs: AttributeSet) {
        self.graph
            .declare_edge(self.index, source.into(), target.into(), &attrs);
    }

    /// Amends this scope's default set for `kind`.
    ///
    /// Only elements declared afterwards see the change.
    pub fn attr(&mut self, kind: AttributeKind, attrs: AttributeSet) -> &mut Self {
        self.graph.scope_mut(self.index).amend_defaults(kind, attrs);
        self
    }

    /// Sets a single graph-level attribute of this scope.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attr(AttributeKind::Graph, AttributeSet::new().with(key, value))
    }

    /// Opens a child scope and returns a guard for populating it.
    ///
    /// The child is attached to this scope when the guard is dropped.
    pub fn scoped(
        &mut self,
        name: impl Into<String>,
        cluster: bool,
        attrs: ScopeAttributes,
    ) -> ScopeGuard<'_> {
        ScopeGuard::open(&mut *self.graph, self.index, name.into(), cluster, attrs)
    }

    /// Opens a child scope, hands it to `build`, and attaches it afterwards
    /// whatever `build` returns.
    ///
    /// ```
    /// use dotloom_core::{attrs, graph::Graph, scope::ScopeAttributes};
    ///
    /// let mut graph = Graph::digraph("g");
    /// let result: Result<(), String> =
    ///     graph.subgraph("broken", true, ScopeAttributes::new(), |scope| {
    ///         scope.node("a", attrs! {});
    ///         Err("stopped halfway".to_string())
    ///     });
    ///
    /// assert!(result.is_err());
    /// assert_eq!(graph.root().children().len(), 1);
    /// ```
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
}

/// A child scope under construction.
///
/// Dereferences to [`ScopeMut`]. On drop the child is appended to its parent's
/// children.
pub struct ScopeGuard<'g> {
    scope: ScopeMut<'g>,
    parent: ScopeIndex,
}

impl<'g> ScopeGuard<'g> {
    pub(crate) fn open(
        graph: &'g mut Graph,
        parent: ScopeIndex,
        name: String,
        cluster: bool,
        attrs: ScopeAttributes,
    ) -> Self {
        let index = graph.push_scope(parent, name, cluster, attrs);
        Self {
            scope: ScopeMut::new(graph, index),
            parent,
        }
    }
}

impl<'g> Deref for ScopeGuard<'g> {
    type Target = ScopeMut<'g>;

    fn deref(&self) -> &Self::Target {
        &self.scope
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.scope
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.scope.graph.attach_scope(self.parent, self.scope.index);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;
    use crate::attrs;

    #[test]
    fn test_scope_attributes_builder() {
        let attrs = ScopeAttributes::new()
            .graph(attrs! { "label" => "Storage" })
            .node(attrs! {});

        assert_eq!(
            attrs.get(AttributeKind::Graph),
            Some(&attrs! { "label" => "Storage" })
        );
        assert_eq!(attrs.get(AttributeKind::Node), Some(&AttributeSet::new()));
        assert_eq!(attrs.get(AttributeKind::Edge), None);
    }

    #[test]
    fn test_scope_attributes_amend() {
        let mut attrs = ScopeAttributes::new();
        attrs.amend(AttributeKind::Node, attrs! { "shape" => "box", "color" => "red" });
        attrs.amend(AttributeKind::Node, attrs! { "color" => "blue" });

        assert_eq!(
            attrs.get(AttributeKind::Node),
            Some(&attrs! { "shape" => "box", "color" => "blue" })
        );
    }

    #[test]
    fn test_guard_attaches_on_drop() {
        let mut graph = Graph::digraph("g");
        {
            let mut guard = graph.scoped("grp", true, ScopeAttributes::new());
            guard.node("b", attrs! {});
            assert_eq!(guard.scope().parent(), Some(ScopeIndex::ROOT));
        }

        assert_eq!(graph.root().children().len(), 1);
        let Element::Scope(index) = graph.root().children()[0] else {
            panic!("expected a scope child");
        };
        assert_eq!(graph.scope(index).name(), "grp");
        assert_eq!(graph.scope(index).children(), &[Element::Node(Id::new("b"))]);
    }

    #[test]
    fn test_subgraph_attaches_exactly_once_on_error() {
        let mut graph = Graph::digraph("g");

        let result: Result<(), &str> = graph.subgraph("grp", true, ScopeAttributes::new(), |grp| {
            grp.node("first", attrs! {});
            let populated: Result<(), &str> = Err("failed while populating");
            populated?;
            grp.node("never", attrs! {});
            Ok(())
        });

        assert_eq!(result, Err("failed while populating"));
        assert_eq!(graph.root().children().len(), 1);
        assert!(graph.get_node("first").is_some());
        assert!(graph.get_node("never").is_none());
    }

    #[test]
    fn test_subgraph_attaches_when_build_panics() {
        let mut graph = Graph::digraph("g");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let _: () = graph.subgraph("grp", true, ScopeAttributes::new(), |grp| {
                grp.node("a", attrs! {});
                panic!("boom")
            });
        }));

        assert!(outcome.is_err());
        assert_eq!(graph.root().children().len(), 1);
    }

    #[test]
    fn test_nested_scopes_keep_declaration_order() {
        let mut graph = Graph::digraph("g");
        graph.node("a", attrs! {});
        graph.subgraph("outer", true, ScopeAttributes::new(), |outer| {
            outer.node("b", attrs! {});
            outer.subgraph("inner", false, ScopeAttributes::new(), |inner| {
                inner.node("c", attrs! {});
            });
            outer.edge("b", "c", attrs! {});
        });
        graph.edge("a", "b", attrs! {});

        let root = graph.root().children();
        assert_eq!(root.len(), 3);
        assert_eq!(root[0], Element::Node(Id::new("a")));
        assert!(matches!(root[2], Element::Edge(_)));

        let Element::Scope(outer) = root[1] else {
            panic!("expected outer scope");
        };
        let outer = graph.scope(outer);
        assert_eq!(outer.children().len(), 3);
        assert_eq!(outer.children()[0], Element::Node(Id::new("b")));
        let Element::Scope(inner) = outer.children()[1] else {
            panic!("expected inner scope");
        };
        assert_eq!(graph.scope(inner).parent(), Some(graph.get_node("b").unwrap().scope()));
    }

    #[test]
    fn test_empty_node_defaults_shadow_ancestors() {
        let mut graph = Graph::digraph("g");
        graph.attr(AttributeKind::Node, attrs! { "shape" => "box" });
        graph.subgraph(
            "plain",
            false,
            ScopeAttributes::new().node(AttributeSet::new()),
            |plain| {
                plain.node("n", attrs! { "label" => "N" });
            },
        );

        assert_eq!(
            graph.get_node("n").unwrap().attributes(),
            &attrs! { "label" => "N" }
        );
    }

    #[test]
    fn test_scope_attr_and_set_attr() {
        let mut graph = Graph::digraph("g");
        graph.subgraph("grp", true, ScopeAttributes::new(), |grp| {
            grp.set_attr("label", "Path 1").set_attr("style", "rounded,dashed");
            grp.attr(AttributeKind::Edge, attrs! { "color" => "#0066CC" });
            grp.edge("a", "b", attrs! {});
        });

        let Element::Scope(index) = graph.root().children()[0] else {
            panic!("expected scope");
        };
        let grp = graph.scope(index);
        assert_eq!(
            grp.defaults(AttributeKind::Graph),
            Some(&attrs! { "label" => "Path 1", "style" => "rounded,dashed" })
        );
        assert_eq!(
            graph.edges().next().unwrap().attributes().get("color"),
            Some("#0066CC")
        );
    }

    #[test]
    fn test_block_names() {
        let mut graph = Graph::digraph("g");
        let names: Vec<Option<String>> = [("x", true), ("cluster_gen", false), ("same", false), ("", false)]
            .into_iter()
            .map(|(name, cluster)| {
                graph
                    .scoped(name, cluster, ScopeAttributes::new())
                    .scope()
                    .block_name()
                    .map(Cow::into_owned)
            })
            .collect();

        assert_eq!(
            names,
            vec![
                Some("cluster_x".to_string()),
                Some("cluster_gen".to_string()),
                Some("same".to_string()),
                None,
            ]
        );
    }
}
