//! ARM64 compute pipeline: preprocessing, MediaPipe inference, compute backends.

use dotloom::{attrs, config::ThemeConfig, graph::Graph};

use super::{filled, pipeline_style, stage};

pub(super) fn build(theme: &ThemeConfig) -> Graph {
    let mut graph = Graph::digraph("").with_comment("ARM64 Compute Pipeline");
    pipeline_style(&mut graph, "TB", "0.8", "1.0");
    theme.apply(&mut graph);

    graph.node("input", filled("UIImage\n(RGBA, up to 4K)", "lightgreen"));

    graph.subgraph("cluster_preprocessing", true, stage("ARM64 Image Preprocessing", "lightyellow"), |c| {
        c.node("vimage", filled("vImage (Accelerate)\nSIMD-optimized scaling\nARMv8 NEON instructions", "#FFE4B5"));
        c.node("resize", filled("Resize to 224×224\n~0.5ms on A17 Pro", "#FFE4B5"));
        c.node("normalize", filled("Normalize [-1, 1]\nFP16 → INT8 quantization", "#FFE4B5"));
    });

    graph.subgraph("cluster_mediapipe", true, stage("MediaPipe Tasks GenAI", "#E6F3FF"), |c| {
        c.node("vision_enc", filled("Vision Encoder\n(TFLite, INT4 quantized)\nKleidiAI accelerated", "#B0E0E6"));
        c.node("vision_adapt", filled("Vision Adapter\n(Cross-attention)", "#B0E0E6"));
        c.node("gemma_llm", filled("Gemma 3N LLM\n(2B/4B params, INT4)\nXNNPACK + SME2", "#B0E0E6"));
    });

    graph.subgraph("cluster_backend", true, stage("ARM Compute Backend", "#FFE6E6"), |c| {
        c.node("kleidiai", filled("KleidiAI\nARM Kleidi library\nMatmul optimization", "#FFB6C1"));
        c.node("xnnpack", filled("XNNPACK\nQuantized ops\nINT4/INT8 kernels", "#FFB6C1"));
        c.node("sme2", filled("SME2 Compatible\nScalable Matrix Ext\n(A-series ready)", "#FFB6C1"));
    });

    graph.node("latex_output", filled("LaTeX String\n~100-500 tokens", "lightgreen"));

    graph.edge("input", "vimage", attrs! {});
    graph.edge("vimage", "resize", attrs! {});
    graph.edge("resize", "normalize", attrs! {});
    graph.edge("normalize", "vision_enc", attrs! { "label" => "[224×224×3] tensor" });
    graph.edge("vision_enc", "vision_adapt", attrs! { "label" => "768-dim embeddings" });
    graph.edge("vision_adapt", "gemma_llm", attrs! { "label" => "Multimodal tokens" });
    graph.edge("gemma_llm", "latex_output", attrs! { "label" => "~2-8s inference" });

    // Backend offload
    for (source, target, label) in [
        ("vision_enc", "kleidiai", "matmul"),
        ("gemma_llm", "xnnpack", "quantized ops"),
        ("gemma_llm", "sme2", "matrix ext"),
    ] {
        graph.edge(source, target, attrs! { "style" => "dashed", "label" => label, "color" => "red" });
    }

    graph
}
