//! Image-to-PDF pipeline, left to right, from image input to stored PDF.

use dotloom::{attributes::AttributeKind, attrs, config::ThemeConfig, graph::Graph, scope::ScopeAttributes};

use super::{card, layer, sketch_style};

const INPUT: &str = "#0066CC";
const ARM: &str = "#FF6B35";
const VISION: &str = "#9C27B0";
const GEMMA: &str = "#527FFF";
const LATEX: &str = "#4CAF50";
const PDF: &str = "#E91E63";

/// A pipeline stage: a layer with a smaller title.
fn stage_layer(label: &str, color: &str) -> ScopeAttributes {
    let mut scope = layer(label, color);
    scope.amend(AttributeKind::Graph, attrs! { "fontsize" => "10" });
    scope
}

pub(super) fn build(theme: &ThemeConfig) -> Graph {
    let mut graph = Graph::digraph("AI_Pipeline").with_comment("Image-to-PDF Pipeline");
    sketch_style(&mut graph, "LR", "0.6", "1.2");
    theme.apply(&mut graph);

    graph.subgraph("cluster_input", true, stage_layer("1. Image Input", INPUT), |c| {
        c.node("photos", card("PhotosPicker", "#E8F4F8", "1.8"));
        c.node("camera", card("Camera", "#E8F4F8", "1.8"));
        c.node("images", card("UIImage[]\nup to 10", "#B3E0FF", "1.8"));
    });

    graph.subgraph("cluster_arm", true, stage_layer("2. ARM64 Preprocessing", ARM), |c| {
        c.node("vimage", card("vImage\nAccelerate", "#FFE0B2", "1.8"));
        c.node("parallel", card("Parallel\nTaskGroup", "#FFCC80", "1.8"));
        c.node("downscaled", card("CGImage[]\n1024-1536px", "#FFB74D", "1.8"));
    });

    graph.subgraph("cluster_vision", true, stage_layer("3. Vision Encoding", VISION), |c| {
        c.node("encoder", card("Vision Encoder\nTFLite", "#E1BEE7", "1.8"));
        c.node("adapter", card("Vision Adapter\nTFLite", "#CE93D8", "1.8"));
    });

    graph.subgraph("cluster_gemma", true, stage_layer("4. Gemma 3N Inference", GEMMA), |c| {
        c.node("gemma", card("Gemma 3N\nINT4 Quantized\n2B or 4B", "#BBD7FF", "2.0"));
        c.node("stream", card("Token Stream\n30fps Updates", "#90CAF9", "1.8"));
    });

    graph.subgraph("cluster_latex", true, stage_layer("5. LaTeX Generation", LATEX), |c| {
        c.node("extract", card("Extract\nLaTeX", "#C8E6C9", "1.8"));
        c.node("latex", card("LaTeX Code\nValidated", "#A5D6A7", "1.8"));
    });

    graph.subgraph("cluster_pdf", true, stage_layer("6. Client-Side Rendering", PDF), |c| {
        c.node("webview", card("WKWebView\n+ latex.js", "#F8BBD0", "1.8"));
        c.node("pdfgen", card("createPDF()", "#F48FB1", "1.8"));
        c.node("pdfout", card("PDFDocument", "#EC407A", "1.8").with("fontcolor", "white"));
    });

    graph.node("storage", card("SwiftData\nStorage", "#81C784", "1.8").with("fontcolor", "white"));

    graph.edge("photos", "images", attrs! {});
    graph.edge("camera", "images", attrs! {});
    graph.edge("images", "vimage", attrs! { "label" => "up to 5\nfor inference", "color" => INPUT });

    graph.edge("vimage", "parallel", attrs! { "label" => "ARM64\nSIMD", "color" => ARM, "penwidth" => "2.5" });
    graph.edge("parallel", "downscaled", attrs! { "label" => "30-70%\nreduction", "color" => ARM });

    graph.edge("downscaled", "encoder", attrs! { "color" => VISION });
    graph.edge("encoder", "adapter", attrs! { "label" => "embeddings", "color" => VISION });

    graph.edge("adapter", "gemma", attrs! { "label" => "vision\ninput", "color" => GEMMA, "penwidth" => "2.5" });
    graph.edge("gemma", "stream", attrs! { "label" => "INT4 ops\nARM64", "color" => GEMMA });

    graph.edge("stream", "extract", attrs! { "color" => LATEX });
    graph.edge("extract", "latex", attrs! { "label" => "strip\nmarkdown", "color" => LATEX });

    graph.edge("latex", "webview", attrs! { "label" => "inject\nHTML", "color" => PDF });
    graph.edge("webview", "pdfgen", attrs! { "label" => "compile", "color" => PDF });
    graph.edge("pdfgen", "pdfout", attrs! { "color" => PDF, "penwidth" => "2" });

    graph.edge("latex", "storage", attrs! { "label" => "persist", "color" => LATEX, "style" => "dashed" });
    graph.edge("pdfout", "storage", attrs! { "label" => "persist", "color" => PDF, "style" => "dashed" });

    graph
}
