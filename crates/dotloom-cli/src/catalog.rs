//! Built-in diagram catalog.
//!
//! Each entry is a builder function producing a [`Graph`]. The output file of
//! an entry is named after it (`out/<name>.<ext>`).

mod ai_pipeline;
mod architecture_overview;
mod arm64_compute_pipeline;
mod arm_optimizations;
mod data_flow;
mod int4_quantization_impact;
mod mediapipe_architecture;
mod memory_thermal_management;
mod multimodal_inference_flow;
mod performance_monitoring;

use dotloom::{
    DotloomError,
    attributes::{AttributeKind, AttributeSet},
    attrs,
    config::ThemeConfig,
    graph::Graph,
    scope::ScopeAttributes,
};

/// A named diagram in the catalog.
#[derive(Debug, Clone, Copy)]
pub struct Diagram {
    name: &'static str,
    description: &'static str,
    build: fn(&ThemeConfig) -> Graph,
}

impl Diagram {
    /// Base name of the output file.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Builds the diagram, layering `theme` over its root defaults.
    pub fn build(&self, theme: &ThemeConfig) -> Graph {
        (self.build)(theme)
    }
}

const CATALOG: [Diagram; 10] = [
    Diagram {
        name: "architecture_overview",
        description: "Layered architecture of the Pic2PDF app",
        build: architecture_overview::build,
    },
    Diagram {
        name: "data_flow",
        description: "All major data paths through the system",
        build: data_flow::build,
    },
    Diagram {
        name: "ai_pipeline",
        description: "Image-to-PDF processing flow, stage by stage",
        build: ai_pipeline::build,
    },
    Diagram {
        name: "arm_optimizations",
        description: "ARM-specific optimizations across the app",
        build: arm_optimizations::build,
    },
    Diagram {
        name: "performance_monitoring",
        description: "Metrics collection, aggregation and display",
        build: performance_monitoring::build,
    },
    Diagram {
        name: "1_arm64_compute_pipeline",
        description: "ARM64 preprocessing, inference and compute backends",
        build: arm64_compute_pipeline::build,
    },
    Diagram {
        name: "2_multimodal_inference_flow",
        description: "Token-level flow through the vision encoder and Gemma 3N",
        build: multimodal_inference_flow::build,
    },
    Diagram {
        name: "3_memory_thermal_management",
        description: "Real-time memory and thermal monitoring loop",
        build: memory_thermal_management::build,
    },
    Diagram {
        name: "4_mediapipe_architecture",
        description: "MediaPipe layers down to ARM64 hardware",
        build: mediapipe_architecture::build,
    },
    Diagram {
        name: "5_int4_quantization_impact",
        description: "Memory and speed gains of INT4 weights",
        build: int4_quantization_impact::build,
    },
];

/// All diagrams, in catalog order.
pub fn all() -> &'static [Diagram] {
    &CATALOG
}

/// Looks up a diagram by name.
pub fn find(name: &str) -> Option<&'static Diagram> {
    CATALOG.iter().find(|diagram| diagram.name == name)
}

/// Resolves `names` to diagrams, or the whole catalog when `names` is empty.
///
/// # Errors
///
/// Returns [`DotloomError::Config`] naming every unknown diagram.
pub fn select(names: &[String]) -> Result<Vec<&'static Diagram>, DotloomError> {
    if names.is_empty() {
        return Ok(CATALOG.iter().collect());
    }

    let mut selected = Vec::with_capacity(names.len());
    let mut unknown = Vec::new();
    for name in names {
        match find(name) {
            Some(diagram) => selected.push(diagram),
            None => unknown.push(name.as_str()),
        }
    }

    if unknown.is_empty() {
        Ok(selected)
    } else {
        Err(DotloomError::Config(format!(
            "unknown diagram(s): {}; run `dotloom list` to see the catalog",
            unknown.join(", ")
        )))
    }
}

const FONT: &str = "Comic Sans MS";
const INK: &str = "#2c3e50";

/// Root defaults of the hand-drawn look shared by the overview diagrams.
fn sketch_style(graph: &mut Graph, rankdir: &str, nodesep: &str, ranksep: &str) {
    graph.attr(
        AttributeKind::Graph,
        attrs! {
            "rankdir" => rankdir,
            "bgcolor" => "white",
            "fontname" => FONT,
            "fontcolor" => INK,
            "dpi" => "300",
            "nodesep" => nodesep,
            "ranksep" => ranksep,
        },
    );
    graph.attr(
        AttributeKind::Node,
        attrs! {
            "shape" => "box",
            "style" => "rounded,filled",
            "fontname" => FONT,
            "fontsize" => "10",
            "penwidth" => "2",
            "margin" => "0.3,0.15",
            "fillcolor" => "#fffef7",
            "color" => INK,
        },
    );
    graph.attr(
        AttributeKind::Edge,
        attrs! {
            "fontname" => FONT,
            "fontsize" => "9",
            "fontcolor" => INK,
            "penwidth" => "1.5",
            "color" => INK,
        },
    );
}

/// Root defaults of the numbered pipeline diagrams.
fn pipeline_style(graph: &mut Graph, rankdir: &str, nodesep: &str, ranksep: &str) {
    graph.attr(
        AttributeKind::Graph,
        attrs! {
            "rankdir" => rankdir,
            "splines" => "ortho",
            "nodesep" => nodesep,
            "ranksep" => ranksep,
        },
    );
    graph.attr(
        AttributeKind::Node,
        attrs! {
            "shape" => "box",
            "style" => "rounded,filled",
            "fillcolor" => "lightblue",
            "fontname" => FONT,
            "fontsize" => "11",
        },
    );
    graph.attr(AttributeKind::Edge, attrs! { "fontname" => FONT, "fontsize" => "10" });
}

/// Dashed cluster outlining one layer or path.
fn layer(label: &str, color: &str) -> ScopeAttributes {
    ScopeAttributes::new().graph(attrs! {
        "label" => label,
        "style" => "rounded,dashed",
        "color" => color,
        "fontsize" => "11",
        "labelloc" => "t",
    })
}

/// Filled cluster grouping one stage.
fn stage(label: &str, fillcolor: &str) -> ScopeAttributes {
    ScopeAttributes::new().graph(attrs! {
        "label" => label,
        "style" => "rounded,filled",
        "fillcolor" => fillcolor,
        "fontname" => FONT,
        "fontsize" => "12",
    })
}

/// A labelled, filled box of a fixed width.
fn card(label: &str, fillcolor: &str, width: &str) -> AttributeSet {
    attrs! { "label" => label, "fillcolor" => fillcolor, "width" => width }
}

/// A labelled, filled box.
fn filled(label: &str, fillcolor: &str) -> AttributeSet {
    attrs! { "label" => label, "fillcolor" => fillcolor }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use dotloom::export::dot::to_dot;

    use super::*;

    #[test]
    fn test_catalog_size() {
        assert_eq!(all().len(), 10);
        assert!(find("5_int4_quantization_impact").is_some());
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = all().iter().map(Diagram::name).collect();
        assert_eq!(names.len(), all().len());
    }

    #[test]
    fn test_select_all_when_empty() {
        let selected = select(&[]).unwrap();
        assert_eq!(selected.len(), all().len());
    }

    #[test]
    fn test_select_by_name_keeps_order() {
        let selected = select(&["data_flow".to_string(), "architecture_overview".to_string()]).unwrap();
        let names: Vec<_> = selected.iter().map(|diagram| diagram.name()).collect();
        assert_eq!(names, vec!["data_flow", "architecture_overview"]);
    }

    #[test]
    fn test_select_reports_unknown_names() {
        let err = select(&["data_flow".to_string(), "nope".to_string(), "missing".to_string()])
            .unwrap_err();

        match err {
            DotloomError::Config(message) => {
                assert!(message.contains("nope, missing"), "{message}");
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_every_diagram_declares_its_edge_endpoints() {
        for diagram in all() {
            let graph = diagram.build(&ThemeConfig::default());
            assert!(
                graph.undeclared_endpoints().is_empty(),
                "{} has undeclared endpoints",
                diagram.name()
            );
            assert!(graph.edge_count() > 0);
        }
    }

    #[test]
    fn test_every_diagram_serializes_deterministically() {
        for diagram in all() {
            let first = to_dot(&diagram.build(&ThemeConfig::default())).unwrap();
            let second = to_dot(&diagram.build(&ThemeConfig::default())).unwrap();
            assert_eq!(first, second, "{}", diagram.name());
        }
    }

    #[test]
    fn test_theme_overrides_root_node_defaults() {
        let theme: ThemeConfig = toml::from_str(
            r#"
            [node]
            fontname = "Helvetica"
            "#,
        )
        .unwrap();

        let graph = find("data_flow").unwrap().build(&theme);
        let dot = to_dot(&graph).unwrap();

        assert!(dot.contains("fontname=Helvetica"), "{dot}");
        assert!(!dot.contains("node [shape=box style=\"rounded,filled\" fontname=\"Comic Sans MS\""));
    }
}
