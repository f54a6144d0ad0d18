//! Token-level flow through the vision encoder, adapter and Gemma 3N.

use dotloom::{attrs, config::ThemeConfig, graph::Graph};

use super::{filled, pipeline_style, stage};

pub(super) fn build(theme: &ThemeConfig) -> Graph {
    let mut graph = Graph::digraph("").with_comment("Multimodal Inference Flow");
    pipeline_style(&mut graph, "LR", "0.6", "1.2");
    theme.apply(&mut graph);

    graph.node("img_in", filled("Input Image\n224×224×3", "lightgreen"));

    graph.subgraph("cluster_vision", true, stage("Vision Processing (TFLite)", "#FFF8DC"), |c| {
        c.node("encoder", filled("SigLIP Encoder\n12 layers\nINT4 quantized\n~150ms", "#FAFAD2"));
        c.node("pool", filled("Attention Pooling\n256 patches → 64 tokens", "#FAFAD2"));
    });

    graph.subgraph("cluster_adapter", true, stage("Vision-Language Adapter", "#E6F3FF"), |c| {
        c.node("cross_attn", filled("Cross-Attention\n768-dim → 2048-dim\nLinear projection", "#B0E0E6"));
        c.node("prefix", filled("Multimodal Prefix\n64 vision tokens\n+\n32 prompt tokens", "#B0E0E6"));
    });

    graph.subgraph("cluster_llm", true, stage("Gemma 3N LLM (Autoregressive)", "#FFE6F0"), |c| {
        c.node("embed", filled("Token Embedding\n2048-dim", "#FFB6C1"));
        c.node("transformer", filled("Transformer Stack\n18 layers (2B)\n26 layers (4B)\nMQA, RoPE", "#FFB6C1"));
        c.node("lm_head", filled("LM Head\nSoftmax → token_id\n~256k vocab", "#FFB6C1"));
    });

    graph.node("latex_out", filled("LaTeX Output\n~100-500 tokens\n2-8s total", "lightgreen"));

    graph.edge("img_in", "encoder", attrs! {});
    for (source, target, label) in [
        ("encoder", "pool", "[768] embeddings"),
        ("pool", "cross_attn", "64 vision tokens"),
        ("cross_attn", "prefix", "projected to LLM dim"),
        ("prefix", "embed", "96 multimodal tokens"),
        ("embed", "transformer", "[B, 96, 2048]"),
        ("transformer", "lm_head", "hidden states"),
        ("lm_head", "latex_out", "autoregressive\n~50 tok/s"),
    ] {
        graph.edge(source, target, attrs! { "label" => label });
    }

    // Autoregressive feedback
    graph.edge(
        "lm_head",
        "embed",
        attrs! { "label" => "next token", "style" => "dashed", "color" => "blue", "constraint" => "false" },
    );

    graph
}

#[cfg(test)]
mod tests {
    use dotloom::export::dot::to_dot;

    use super::*;

    #[test]
    fn test_left_to_right_layout() {
        let dot = to_dot(&build(&ThemeConfig::default())).unwrap();

        assert!(dot.contains("\tgraph [rankdir=LR splines=ortho nodesep=0.6 ranksep=1.2]\n"));
    }

    #[test]
    fn test_feedback_edge_does_not_constrain_ranking() {
        let graph = build(&ThemeConfig::default());

        let feedback = graph
            .edges()
            .find(|edge| edge.source() == "lm_head" && edge.target() == "embed")
            .unwrap();
        assert_eq!(feedback.attributes().get("constraint"), Some("false"));
        assert_eq!(feedback.attributes().get("fontsize"), Some("10"));
        assert_eq!(graph.node_count(), 9);
        assert_eq!(graph.edge_count(), 9);
    }
}
