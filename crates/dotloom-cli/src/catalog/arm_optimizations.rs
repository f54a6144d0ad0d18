//! ARM-specific optimizations: vImage, quantization, tuning, thermal and metrics.

use dotloom::{attrs, config::ThemeConfig, graph::Graph};

use super::{INK, card, layer, sketch_style};

const VIMAGE: &str = "#FF6B35";
const QUANT: &str = "#9C27B0";
const PERF: &str = "#0066CC";
const THERMAL: &str = "#E91E63";
const METRICS: &str = "#4CAF50";

pub(super) fn build(theme: &ThemeConfig) -> Graph {
    let mut graph = Graph::digraph("ARM64_Optimizations").with_comment("ARM64 Optimizations");
    sketch_style(&mut graph, "TB", "0.7", "1.0");
    theme.apply(&mut graph);

    graph.subgraph("cluster_vimage", true, layer("vImage Preprocessing (Accelerate)", VIMAGE), |c| {
        c.node("input", card("Input Images\nup to 10", "#FFE0B2", "2.0"));
        c.node("taskgroup", card("Parallel TaskGroup\nPriority: userInitiated", "#FFCC80", "2.4"));
        c.node("vimage_scale", card("vImageScale_ARGB8888\nARM NEON SIMD", "#FFB74D", "2.4"));
        c.node(
            "output",
            card("Downscaled CGImage\n30-70% reduction", "#FFA726", "2.4").with("fontcolor", "white"),
        );
    });

    graph.subgraph("cluster_quant", true, layer("Model Quantization", QUANT), |c| {
        c.node("fp16", card("FP16 Model\n~2GB (2B)\n~3.6GB (4B)", "#E1BEE7", "2.2"));
        c.node("int4", card("INT4 Quantization\n4-bit integers", "#CE93D8", "2.2"));
        c.node(
            "compressed",
            card("Gemma 3N INT4\n~500MB (2B)\n~900MB (4B)", "#BA68C8", "2.4").with("fontcolor", "white"),
        );
    });

    graph.subgraph("cluster_perf", true, layer("Performance Mode Tuning", PERF), |c| {
        c.node("mode", card("Performance Mode\nUserDefaults", "#E8F4F8", "2.2"));
        c.node("tokens", card("Max Tokens\n1200 / 2000", "#B3E0FF", "2.0"));
        c.node("size", card("Image Size\n1024 / 1536px", "#B3E0FF", "2.0"));
        c.node("sampling", card("Sampling\ntopK/topP/temp", "#B3E0FF", "2.0"));
    });

    graph.subgraph("cluster_thermal", true, layer("Thermal Management", THERMAL), |c| {
        c.node("monitor", card("ProcessInfo\n.thermalState", "#F8BBD0", "2.2"));
        c.node("nominal", card("Nominal\nFull Speed", "#C8E6C9", "1.6"));
        c.node("fair", card("Fair\n+3°C", "#FFF9C4", "1.6"));
        c.node("serious", card("Serious\n+8°C", "#FFCC80", "1.6"));
        c.node("critical", card("Critical\n+12°C", "#FFAB91", "1.6"));
    });

    graph.subgraph("cluster_metrics", true, layer("Real-Time Metrics", METRICS), |c| {
        c.node("timer", card("Timer\n1s interval", "#C8E6C9", "1.8"));
        c.node("memory", card("Memory\nResident MB", "#A5D6A7", "1.8"));
        c.node("cpu", card("CPU Usage\n%", "#A5D6A7", "1.8"));
        c.node("battery", card("Battery\nImpact", "#A5D6A7", "1.8"));
    });

    graph.edge("input", "taskgroup", attrs! { "label" => "parallelize", "color" => VIMAGE });
    graph.edge("taskgroup", "vimage_scale", attrs! { "label" => "ARM64\nSIMD", "color" => VIMAGE, "penwidth" => "2.5" });
    graph.edge("vimage_scale", "output", attrs! { "label" => "fast\nresize", "color" => VIMAGE, "penwidth" => "2.5" });

    graph.edge("fp16", "int4", attrs! { "label" => "quantize", "color" => QUANT, "penwidth" => "2.5" });
    graph.edge("int4", "compressed", attrs! { "label" => "4x\ncompression", "color" => QUANT, "penwidth" => "2.5" });

    for setting in ["tokens", "size", "sampling"] {
        graph.edge("mode", setting, attrs! { "label" => "configure", "color" => PERF });
    }

    graph.edge("monitor", "nominal", attrs! { "color" => "#4CAF50" });
    graph.edge("monitor", "fair", attrs! { "color" => "#FFC107" });
    graph.edge("monitor", "serious", attrs! { "color" => "#FF9800" });
    graph.edge("monitor", "critical", attrs! { "color" => "#F44336", "penwidth" => "2" });

    for metric in ["memory", "cpu", "battery"] {
        graph.edge("timer", metric, attrs! { "label" => "poll", "color" => METRICS });
    }

    // Cross-section links
    graph.edge(
        "output",
        "compressed",
        attrs! { "label" => "feeds into\ninference", "style" => "dashed", "color" => INK },
    );
    graph.edge(
        "mode",
        "size",
        attrs! { "label" => "affects", "style" => "dashed", "constraint" => "false", "color" => INK },
    );
    graph.edge("monitor", "mode", attrs! { "label" => "adapts", "style" => "dashed", "color" => THERMAL });

    graph
}
