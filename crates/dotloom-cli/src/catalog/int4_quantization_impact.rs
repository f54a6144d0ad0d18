//! FP16 against INT4 weights: memory, speed and the quantization steps.

use dotloom::{attrs, config::ThemeConfig, graph::Graph};

use super::{filled, pipeline_style, stage};

pub(super) fn build(theme: &ThemeConfig) -> Graph {
    let mut graph = Graph::digraph("").with_comment("INT4 Quantization Impact");
    pipeline_style(&mut graph, "LR", "1.0", "1.5");
    theme.apply(&mut graph);

    graph.subgraph("cluster_fp16", true, stage("FP16 Baseline (Not Used)", "#FFE6E6"), |c| {
        c.node("fp16_model", filled("Gemma 2B\nFP16 weights\n~4GB on disk\n16 bits/param", "#FFB6C1"));
        c.node("fp16_mem", filled("Runtime Memory\n~5-6GB RAM\n(weights + activations)", "#FFB6C1"));
        c.node("fp16_perf", filled("Performance\n~15 tok/s\niPhone 15 Pro", "#FFB6C1"));
    });

    graph.subgraph("cluster_int4", true, stage("INT4 Quantized (Actual)", "#E6FFE6"), |c| {
        c.node("int4_model", filled("Gemma 2B\nINT4 weights\n~1GB on disk\n4 bits/param", "#90EE90"));
        c.node("int4_mem", filled("Runtime Memory\n~1.5-2GB RAM\n4× reduction", "#90EE90"));
        c.node("int4_perf", filled("Performance\n~40-50 tok/s\niPhone 15 Pro", "#90EE90"));
    });

    graph.subgraph("cluster_quant", true, stage("Quantization Process", "#FFF8DC"), |c| {
        c.node("scale", filled("Per-channel scaling\nW_int4 = round(W_fp16 / scale)", "#FAFAD2"));
        c.node("lookup", filled("Dequant lookup tables\nStored with model", "#FAFAD2"));
        c.node("runtime", filled("Runtime dequantization\nINT4 → FP16 on-the-fly\nCached in L1", "#FAFAD2"));
    });

    graph.subgraph("cluster_benefits", true, stage("ARM64 Benefits", "#E6F3FF"), |c| {
        c.node("bandwidth", filled("Memory Bandwidth\n4× less DRAM traffic\nFits in L2/L3 cache", "#B0E0E6"));
        c.node("battery", filled("Power Efficiency\nLess DRAM access\nLower thermal load", "#B0E0E6"));
        c.node("latency", filled("Lower Latency\nFaster weight loading\nBetter tok/s", "#B0E0E6"));
    });

    graph.edge("fp16_model", "scale", attrs! { "label" => "offline quantization", "style" => "dashed" });
    graph.edge("scale", "lookup", attrs! {});
    graph.edge("lookup", "int4_model", attrs! {});

    graph.edge("int4_model", "runtime", attrs! { "label" => "load time" });
    graph.edge("runtime", "int4_mem", attrs! { "label" => "minimal overhead" });
    graph.edge("int4_mem", "int4_perf", attrs! { "label" => "inference" });

    for (source, target) in [("int4_mem", "bandwidth"), ("int4_mem", "battery"), ("int4_perf", "latency")] {
        graph.edge(source, target, attrs! { "color" => "green" });
    }

    // Side-by-side comparisons stay out of the ranking.
    for (source, target, label) in [
        ("fp16_model", "int4_model", "4× compression"),
        ("fp16_mem", "int4_mem", "4× RAM reduction"),
        ("fp16_perf", "int4_perf", "3× speedup"),
    ] {
        graph.edge(
            source,
            target,
            attrs! { "label" => label, "color" => "blue", "constraint" => "false", "style" => "dashed" },
        );
    }

    graph
}
