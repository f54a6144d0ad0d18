//! Complete data flow: generation, refinement, model management and history.

use dotloom::{attrs, config::ThemeConfig, graph::Graph};

use super::{INK, card, layer, sketch_style};

const GENERATION: &str = "#0066CC";
const REFINEMENT: &str = "#9C27B0";
const MODEL: &str = "#FF9800";
const STORAGE: &str = "#4CAF50";
const HISTORY: &str = "#E91E63";

pub(super) fn build(theme: &ThemeConfig) -> Graph {
    let mut graph = Graph::digraph("Data_Flow").with_comment("Complete Data Flow");
    sketch_style(&mut graph, "TB", "0.6", "0.9");
    theme.apply(&mut graph);

    graph.subgraph("cluster_gen", true, layer("Path 1: Image → LaTeX → PDF", GENERATION), |generation| {
        generation.node("input", card("User Input\nPhotos/Camera", "#E8F4F8", "2.0"));
        generation.node("llm_gen", card("OnDeviceLLMService\n.generateLaTeX()", "#B3E0FF", "2.4"));
        generation.node("latex", card("LaTeX String", "#90CAF9", "2.0"));
        generation.node("renderer", card("LaTeXRenderer\n.renderLaTeXToPDF()", "#64B5F6", "2.4"));
        generation.node("pdf", card("PDFDocument", "#42A5F5", "2.0").with("fontcolor", "white"));
    });

    graph.subgraph("cluster_refine", true, layer("Path 2: LaTeX Refinement", REFINEMENT), |refine| {
        refine.node("existing", card("Existing LaTeX\nfrom Generation", "#E1BEE7", "2.2"));
        refine.node("feedback", card("User Feedback\nText Input", "#E1BEE7", "2.2"));
        refine.node("llm_refine", card("OnDeviceLLMService\n.refineLaTeX()", "#CE93D8", "2.4"));
        refine.node("refined", card("Refined LaTeX", "#BA68C8", "2.0"));
    });

    graph.subgraph("cluster_model", true, layer("Path 3: Model Management", MODEL), |model| {
        model.node("settings", card("SettingsView\nDownload Request", "#FFE0B2", "2.2"));
        model.node("downloader", card("Model Download\nManager", "#FFCC80", "2.2"));
        model.node("r2", card("Cloudflare R2\nHTTPS Download", "#FFB74D", "2.2"));
        model.node("local", card("Documents/\nmodels/*.task", "#FFA726", "2.2"));
        model.node("init", card("OnDeviceLLMService\n.initializeModel()", "#FF9800", "2.4"));
        model.node("extract", card("ZIPFoundation\nExtract Vision", "#FB8C00", "2.2"));
        model.node("cache", card("AppSupport/\nVision Models", "#F57C00", "2.2"));
    });

    graph.subgraph("cluster_storage", true, layer("SwiftData Storage", STORAGE), |storage| {
        storage.node("mgr", card("StorageManager", "#C8E6C9", "2.0"));
        storage.node("gen_model", card("Generation Model\nimages, latex, pdf", "#A5D6A7", "2.4"));
        storage.node("ref_model", card("RefinementEntry\nfeedback, history", "#A5D6A7", "2.4"));
    });

    graph.subgraph("cluster_history", true, layer("Path 4: History Access", HISTORY), |history| {
        history.node("hist_view", card("HistoryView", "#F8BBD0", "2.0"));
        history.node("search", card("Search Query\n(optional)", "#F8BBD0", "2.0"));
        history.node("results", card("Sorted Results\nby timestamp", "#F48FB1", "2.2"));
    });

    // Path 1
    graph.edge("input", "llm_gen", attrs! { "label" => "images[]", "color" => GENERATION, "penwidth" => "2.5" });
    graph.edge("llm_gen", "latex", attrs! { "label" => "stream", "color" => GENERATION, "penwidth" => "2.5" });
    graph.edge("latex", "renderer", attrs! { "label" => "on-demand", "color" => GENERATION });
    graph.edge("renderer", "pdf", attrs! { "label" => "create", "color" => GENERATION });
    graph.edge("latex", "mgr", attrs! { "label" => "auto-save", "color" => STORAGE, "penwidth" => "2" });
    graph.edge("pdf", "mgr", attrs! { "label" => "auto-save", "color" => STORAGE, "penwidth" => "2" });
    graph.edge("mgr", "gen_model", attrs! { "label" => "persist", "color" => STORAGE });

    // Path 2
    graph.edge("existing", "llm_refine", attrs! { "color" => REFINEMENT });
    graph.edge("feedback", "llm_refine", attrs! { "color" => REFINEMENT });
    graph.edge("llm_refine", "refined", attrs! { "label" => "text-only\ninference", "color" => REFINEMENT, "penwidth" => "2" });
    graph.edge("refined", "mgr", attrs! { "label" => "update", "color" => STORAGE });
    graph.edge("mgr", "ref_model", attrs! { "label" => "append", "color" => STORAGE });
    graph.edge("ref_model", "gen_model", attrs! { "label" => "linked", "style" => "dashed", "color" => STORAGE });

    // Path 3
    graph.edge("settings", "downloader", attrs! { "label" => "download", "color" => MODEL, "penwidth" => "2" });
    graph.edge("downloader", "r2", attrs! { "label" => "HTTP GET", "color" => MODEL });
    graph.edge("r2", "local", attrs! { "label" => ".task file", "color" => MODEL });
    graph.edge("local", "init", attrs! { "label" => "initialize", "color" => MODEL, "penwidth" => "2" });
    graph.edge("init", "extract", attrs! { "label" => "extract", "color" => MODEL });
    graph.edge("extract", "cache", attrs! { "label" => "TF_LITE_*", "color" => MODEL });
    graph.edge("cache", "llm_gen", attrs! { "label" => "load for\ninference", "style" => "dashed", "color" => "#527FFF" });

    // Path 4
    graph.edge("hist_view", "mgr", attrs! { "label" => "load", "color" => HISTORY });
    graph.edge("search", "mgr", attrs! { "label" => "filter", "color" => HISTORY, "style" => "dashed" });
    graph.edge("mgr", "gen_model", attrs! { "label" => "query", "color" => HISTORY, "style" => "dotted" });
    graph.edge("gen_model", "results", attrs! { "label" => "fetch", "color" => HISTORY });

    // Metrics side channel
    for source in ["llm_gen", "llm_refine"] {
        graph.edge(
            source,
            "hist_view",
            attrs! { "label" => "metrics", "style" => "dotted", "color" => INK, "constraint" => "false" },
        );
    }

    graph
}

#[cfg(test)]
mod tests {
    use dotloom::export::dot::to_dot;

    use super::*;

    #[test]
    fn test_counts() {
        let graph = build(&ThemeConfig::default());

        assert_eq!(graph.node_count(), 22);
        assert_eq!(graph.edge_count(), 26);
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let graph = build(&ThemeConfig::default());

        let labels: Vec<_> = graph
            .edges()
            .filter(|edge| edge.source() == "mgr" && edge.target() == "gen_model")
            .filter_map(|edge| edge.attributes().get("label").map(str::to_owned))
            .collect();
        assert_eq!(labels, vec!["persist", "query"]);
    }

    #[test]
    fn test_serialized_header_and_cluster_label() {
        let dot = to_dot(&build(&ThemeConfig::default())).unwrap();

        assert!(dot.starts_with("// Complete Data Flow\ndigraph Data_Flow {\n"));
        assert!(dot.contains("\tsubgraph cluster_gen {\n\t\tgraph [label=\"Path 1: Image → LaTeX → PDF\""));
        assert!(dot.contains("pdf [shape=box"));
        assert!(dot.contains("fontcolor=white]"));
        assert!(dot.contains("\tlocal -> init [fontname=\"Comic Sans MS\""));
        assert!(dot.contains("penwidth=2 color=\"#FF9800\" label=\"initialize\"]"));
    }
}
