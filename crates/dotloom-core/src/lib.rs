//! Dotloom Core Types and Definitions
//!
//! This crate provides the graph model used to describe dotloom diagrams
//! before they are handed to a Graphviz layout engine. It includes:
//!
//! - **Identifiers**: String-interned node identifiers ([`identifier::Id`])
//! - **Attributes**: Ordered, overridable key-value sets ([`attributes::AttributeSet`])
//! - **Graph**: The root of a diagram and its flat node registry ([`graph::Graph`])
//! - **Scope**: Nested subgraphs and clusters with cascading defaults ([`scope`] module)
//! - **DOT**: Lexical rules of the DOT grammar: quoting, escaping, parsing IDs ([`dot`] module)
//!
//! # Example
//!
//! ```
//! use dotloom_core::{attrs, graph::Graph, scope::ScopeAttributes};
//!
//! let mut graph = Graph::digraph("pipeline");
//! graph.node("input", attrs! { "label" => "Start" });
//! graph.subgraph("grp", true, ScopeAttributes::new(), |grp| {
//!     grp.node("output", attrs! { "label" => "End" });
//!     grp.edge("input", "output", attrs! { "label" => "go" });
//! });
//!
//! assert_eq!(graph.node_count(), 2);
//! ```

pub mod attributes;
pub mod dot;
pub mod graph;
pub mod identifier;
pub mod scope;
