//! Metrics collection, aggregation and display.

use dotloom::{attrs, config::ThemeConfig, graph::Graph};

use super::{card, layer, sketch_style};

const COLLECT: &str = "#4CAF50";
const SERVICE: &str = "#527FFF";
const AGGREGATE: &str = "#9C27B0";
const DISPLAY: &str = "#FF9800";

pub(super) fn build(theme: &ThemeConfig) -> Graph {
    let mut graph = Graph::digraph("Performance_Monitoring").with_comment("Performance Monitoring");
    sketch_style(&mut graph, "LR", "0.7", "1.2");
    theme.apply(&mut graph);

    graph.subgraph("cluster_collect", true, layer("Metrics Collection", COLLECT), |c| {
        c.node("timer", card("Timer\n1s interval", "#C8E6C9", "1.8"));
        c.node("process", card("ProcessMetrics\nUtility", "#A5D6A7", "1.8"));
        c.node("memory_fn", card("currentResident\nMemoryMB()", "#81C784", "2.0"));
        c.node("cpu_fn", card("currentCPU\nUsage()", "#81C784", "2.0"));
        c.node("battery", card("UIDevice\nbatteryLevel", "#81C784", "2.0"));
        c.node("thermal", card("ProcessInfo\nthermalState", "#81C784", "2.0"));
    });

    graph.subgraph("cluster_service", true, layer("OnDeviceLLMService (@Published)", SERVICE), |c| {
        c.node("service", card("LLM Service\nSingleton", "#BBD7FF", "2.0"));
        c.node("realtime", card("Real-Time:\nmemory, CPU,\nbattery, thermal,\ntokens/sec", "#90CAF9", "2.2"));
        c.node("history", card("Historical:\ngenerationHistory[]\nlast 50", "#64B5F6", "2.2"));
    });

    graph.subgraph("cluster_agg", true, layer("Data Aggregation", AGGREGATE), |c| {
        c.node("record", card("recordGeneration\nMetrics()", "#E1BEE7", "2.2"));
        c.node("metric", card("GenerationMetrics\ntimestamp, tokens,\ntime, memory", "#CE93D8", "2.4"));
        c.node("stats", card("Computed Stats:\navg time, avg tok/s,\npeak memory", "#BA68C8", "2.4"));
    });

    graph.subgraph("cluster_ui", true, layer("UI Display Layer", DISPLAY), |c| {
        c.node("statsview", card("StatsView\nCharts Framework", "#FFE0B2", "2.2"));
        c.node("charts", card("Line/Bar/Gauge\nCharts", "#FFCC80", "2.0"));
        c.node("overlay", card("Generation\nOverlay", "#FFCC80", "2.0"));
        c.node("cards", card("Metric Cards\n+ Sparklines", "#FFCC80", "2.0"));
    });

    graph.node(
        "instruments",
        card("Xcode Instruments\nOSLog Signposts", "#F8BBD0", "2.4").with("shape", "ellipse"),
    );

    graph.edge("timer", "process", attrs! { "label" => "trigger\nevery 1s", "color" => COLLECT, "penwidth" => "2" });
    graph.edge("process", "memory_fn", attrs! { "color" => COLLECT });
    graph.edge("process", "cpu_fn", attrs! { "color" => COLLECT });

    for source in ["memory_fn", "cpu_fn"] {
        graph.edge(source, "service", attrs! { "label" => "update", "color" => SERVICE, "penwidth" => "2" });
    }
    for source in ["battery", "thermal"] {
        graph.edge(source, "service", attrs! { "label" => "notify", "color" => SERVICE });
    }

    graph.edge("service", "realtime", attrs! { "label" => "@Published", "color" => SERVICE });
    graph.edge("service", "history", attrs! { "label" => "@Published", "color" => SERVICE });

    graph.edge("service", "record", attrs! { "label" => "after\ngeneration", "color" => AGGREGATE });
    graph.edge("record", "metric", attrs! { "color" => AGGREGATE });
    graph.edge("metric", "history", attrs! { "label" => "append", "color" => AGGREGATE, "style" => "dashed" });
    graph.edge("history", "stats", attrs! { "label" => "compute", "color" => AGGREGATE });

    graph.edge("realtime", "overlay", attrs! { "label" => "live\ndata", "color" => DISPLAY, "penwidth" => "2" });
    graph.edge("realtime", "cards", attrs! { "label" => "live\ndata", "color" => DISPLAY, "penwidth" => "2" });
    graph.edge("history", "statsview", attrs! { "label" => "historical\ndata", "color" => DISPLAY, "penwidth" => "2" });
    graph.edge("stats", "statsview", attrs! { "label" => "aggregates", "color" => DISPLAY });
    graph.edge("statsview", "charts", attrs! { "label" => "visualize", "color" => DISPLAY });

    graph.edge(
        "service",
        "instruments",
        attrs! { "label" => "signposts:\nModelInit,\nFirstToken", "style" => "dotted", "color" => "#E91E63" },
    );

    graph
}
