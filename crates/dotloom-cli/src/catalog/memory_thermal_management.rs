//! Memory and thermal management loop around the running inference.

use dotloom::{attributes::AttributeKind, attrs, config::ThemeConfig, graph::Graph};

use super::{filled, pipeline_style, stage};

const MONITORS: [&str; 4] = ["mach_task", "thermal", "battery", "signpost"];

pub(super) fn build(theme: &ThemeConfig) -> Graph {
    let mut graph = Graph::digraph("").with_comment("Memory & Thermal Management");
    pipeline_style(&mut graph, "TB", "0.7", "0.8");
    theme.apply(&mut graph);

    graph.subgraph("cluster_monitoring", true, stage("Real-Time Monitoring", "#E6FFE6"), |c| {
        c.attr(AttributeKind::Node, attrs! { "fillcolor" => "#90EE90" });
        c.node("mach_task", attrs! { "label" => "mach_task_basic_info()\nResident memory (RSS)\nReal measurements" });
        c.node("thermal", attrs! { "label" => "ProcessInfo.thermalState\nNominal/Fair/Serious/Critical" });
        c.node("battery", attrs! { "label" => "UIDevice.batteryLevel\nUIDevice.batteryState" });
        c.node("signpost", attrs! { "label" => "os.signpost\nInstruments integration\nPerf profiling" });
    });

    graph.subgraph("cluster_analysis", true, stage("Performance Analysis", "#FFF8DC"), |c| {
        c.node("stats", filled("ProcessMetrics\nMemory: ±10MB delta\nThermal: state changes", "#FAFAD2"));
        c.node("history", filled("SwiftData Storage\nPer-generation metrics\nHistorical trends", "#FAFAD2"));
    });

    graph.subgraph("cluster_decisions", true, stage("Adaptive Optimization", "#FFE6E6"), |c| {
        c.node("mode_switch", filled("Performance Mode\nBalanced/Power Saver", "#FFB6C1"));
        c.node("throttle", filled("Thermal Throttling\nReduce maxTokens\nBatch size = 1", "#FFB6C1"));
        c.node("cache", filled("Model Caching\nKeep in RAM\nvs. reload from disk", "#FFB6C1"));
    });

    graph.node("inference", filled("LlmInference\n(MediaPipe)\nRunning inference", "#B0E0E6"));

    for (monitor, label) in MONITORS.into_iter().zip(["continuous", "observe", "poll", "log events"]) {
        graph.edge("inference", monitor, attrs! { "label" => label, "style" => "dashed" });
    }
    for monitor in MONITORS {
        graph.edge(monitor, "stats", attrs! {});
    }

    graph.edge("stats", "history", attrs! { "label" => "persist" });
    graph.edge("stats", "mode_switch", attrs! { "label" => "threshold check" });
    graph.edge("stats", "throttle", attrs! { "label" => "if thermal > Fair" });
    graph.edge("stats", "cache", attrs! { "label" => "if memory < 2GB" });

    graph.edge("mode_switch", "inference", attrs! { "label" => "update config", "color" => "blue" });
    graph.edge("throttle", "inference", attrs! { "label" => "reduce load", "color" => "red" });
    graph.edge("cache", "inference", attrs! { "label" => "optimize I/O", "color" => "green" });

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_node_defaults_shadow_root() {
        let graph = build(&ThemeConfig::default());
        let thermal = graph.get_node("thermal").unwrap().attributes();

        // The cluster's node defaults replace the root's entirely.
        assert_eq!(thermal.get("fillcolor"), Some("#90EE90"));
        assert_eq!(thermal.get("shape"), None);
    }

    #[test]
    fn test_feedback_loop() {
        let graph = build(&ThemeConfig::default());

        let into_inference: Vec<_> = graph
            .edges()
            .filter(|edge| edge.target() == "inference")
            .map(|edge| edge.source().name())
            .collect();
        assert_eq!(into_inference, vec!["mode_switch", "throttle", "cache"]);
        assert_eq!(graph.edge_count(), 15);
    }
}
