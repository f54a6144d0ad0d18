//! System architecture overview: presentation, logic, data and external layers.

use dotloom::{attrs, config::ThemeConfig, graph::Graph};

use super::{card, layer, sketch_style};

pub(super) fn build(theme: &ThemeConfig) -> Graph {
    let mut graph = Graph::digraph("Pic2PDF_Architecture").with_comment("System Architecture");
    sketch_style(&mut graph, "TB", "0.7", "1.0");
    theme.apply(&mut graph);

    graph.subgraph("cluster_ui", true, layer("Presentation Layer (SwiftUI)", "#0066CC"), |ui| {
        ui.node("tabview", card("TabView\nMain Container", "#E8F4F8", "2.0"));
        ui.node("generate", card("MainGenerationView\nPhoto Selection", "#B3E0FF", "2.2"));
        ui.node("history", card("HistoryView\nPast Generations", "#B3E0FF", "2.2"));
        ui.node("stats", card("StatsView\nAnalytics", "#B3E0FF", "2.2"));
        ui.node("settings", card("SettingsView\nConfiguration", "#B3E0FF", "2.2"));
    });

    graph.subgraph("cluster_logic", true, layer("Business Logic Layer", "#527FFF"), |logic| {
        logic.node("llm", card("OnDeviceLLMService\nGemma 3N Inference", "#BBD7FF", "2.4"));
        logic.node("renderer", card("LaTeXRenderer\nWKWebView + latex.js", "#BBD7FF", "2.4"));
        logic.node("downloader", card("ModelDownloadManager\nR2 Downloads", "#BBD7FF", "2.4"));
    });

    graph.subgraph("cluster_data", true, layer("Data Layer (SwiftData)", "#33AA55"), |data| {
        data.node("storage", card("StorageManager\nPersistence", "#C8E6C9", "2.2"));
        data.node("generation", card("Generation Model\nLaTeX + Images", "#A5D6A7", "2.2"));
        data.node("refinement", card("RefinementEntry\nFeedback History", "#A5D6A7", "2.2"));
    });

    graph.subgraph("cluster_external", true, layer("External Dependencies", "#FF9800"), |ext| {
        ext.node("mediapipe", card("MediaPipe\nTasks GenAI 0.10.24", "#FFE0B2", "2.4"));
        ext.node("accelerate", card("Accelerate\nvImage (ARM64)", "#FFE0B2", "2.4"));
        ext.node("zip", card("ZIPFoundation\nVision Extract", "#FFE0B2", "2.4"));
    });

    // UI flow
    for tab in ["generate", "history", "stats", "settings"] {
        graph.edge("tabview", tab, attrs! {});
    }

    // Generation
    graph.edge("generate", "llm", attrs! { "label" => "images[]", "color" => "#0066CC", "penwidth" => "2" });
    graph.edge("llm", "generate", attrs! { "label" => "stream\nLaTeX", "color" => "#0066CC", "style" => "dashed" });
    graph.edge("generate", "renderer", attrs! { "label" => "LaTeX", "color" => "#9C27B0" });
    graph.edge("renderer", "generate", attrs! { "label" => "PDF", "color" => "#9C27B0", "style" => "dashed" });

    // Storage
    graph.edge("generate", "storage", attrs! { "label" => "save", "color" => "#33AA55", "penwidth" => "2" });
    graph.edge("history", "storage", attrs! { "label" => "load", "color" => "#33AA55", "style" => "dashed" });
    graph.edge("storage", "generation", attrs! { "label" => "manage" });
    graph.edge("storage", "refinement", attrs! { "label" => "manage" });

    // Model management
    graph.edge("settings", "downloader", attrs! { "label" => "download/\nswitch", "color" => "#FF9800" });
    graph.edge("downloader", "llm", attrs! { "label" => "model\nfiles", "color" => "#FF9800", "style" => "dashed" });

    for (target, label) in [("mediapipe", "inference"), ("accelerate", "downscale"), ("zip", "extract")] {
        graph.edge("llm", target, attrs! { "label" => label, "color" => "#527FFF" });
    }

    graph.edge("llm", "stats", attrs! { "label" => "real-time\nmetrics", "color" => "#DD4477", "style" => "dotted" });

    graph
}

#[cfg(test)]
mod tests {
    use dotloom::{attributes::AttributeKind, graph::Element};

    use super::*;

    #[test]
    fn test_layers_and_counts() {
        let graph = build(&ThemeConfig::default());

        assert_eq!(graph.node_count(), 14);
        assert_eq!(graph.edge_count(), 18);

        let clusters: Vec<_> = graph
            .root()
            .children()
            .iter()
            .filter_map(|element| match element {
                Element::Scope(index) => Some(graph.scope(*index)),
                _ => None,
            })
            .collect();
        assert_eq!(clusters.len(), 4);
        assert!(clusters.iter().all(|scope| scope.is_cluster()));
        assert_eq!(
            clusters[0].defaults(AttributeKind::Graph).unwrap().get("label"),
            Some("Presentation Layer (SwiftUI)")
        );
    }

    #[test]
    fn test_cluster_nodes_inherit_root_defaults() {
        let graph = build(&ThemeConfig::default());
        let llm = graph.get_node("llm").unwrap().attributes();

        assert_eq!(llm.get("shape"), Some("box"));
        assert_eq!(llm.get("fillcolor"), Some("#BBD7FF"));
        assert_eq!(llm.get("label"), Some("OnDeviceLLMService\nGemma 3N Inference"));
    }
}
