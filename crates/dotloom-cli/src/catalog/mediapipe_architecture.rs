//! MediaPipe layers from the Swift wrapper down to ARM64 hardware.

use dotloom::{attrs, config::ThemeConfig, graph::Graph};

use super::{filled, pipeline_style, stage};

pub(super) fn build(theme: &ThemeConfig) -> Graph {
    let mut graph = Graph::digraph("").with_comment("MediaPipe Architecture");
    pipeline_style(&mut graph, "TB", "0.8", "1.0");
    theme.apply(&mut graph);

    graph.node("swift_app", filled("OnDeviceLLMService.swift\nSwift application", "lightgreen"));

    graph.subgraph("cluster_wrapper", true, stage("MediaPipeTasksGenAI (CocoaPod)", "#E6F3FF"), |c| {
        c.node("llm_inf", filled("LlmInference\nSwift class wrapper", "#B0E0E6"));
        c.node("options", filled("LlmInferenceOptions\nmaxTokens\ntemperature\ntopK/topP", "#B0E0E6"));
    });

    graph.subgraph("cluster_cpp", true, stage("MediaPipe C++ Core", "#FFF8DC"), |c| {
        c.node("task_runner", filled("GenAI Task Runner\nGraph executor", "#FAFAD2"));
        c.node("tflite", filled("TFLite Runtime\nModel interpreter\nDelegate dispatch", "#FAFAD2"));
    });

    graph.subgraph("cluster_delegates", true, stage("TFLite Delegates", "#FFE6F0"), |c| {
        c.node("xnn_del", filled("XNNPACK Delegate\nCPU-optimized ops\nINT4/INT8 quantization", "#FFB6C1"));
        c.node("kleidi_del", filled("KleidiAI Integration\nARM Kleidi microkernels\nMatmul acceleration", "#FFB6C1"));
    });

    graph.subgraph("cluster_hardware", true, stage("ARM64 Hardware", "#E6E6FA"), |c| {
        c.node("neon", filled("NEON (ARMv8 SIMD)\n128-bit vectors\nFP16/INT8 arithmetic", "#DDA0DD"));
        c.node("sme2", filled("SME2 (A-series)\nScalable Matrix Ext\n2D register arrays", "#DDA0DD"));
        c.node("cores", filled("CPU Cores\nPerformance + Efficiency\nScheduled by OS", "#DDA0DD"));
    });

    graph.edge("swift_app", "llm_inf", attrs! { "label" => "addImage()\ngenerateResponse()" });
    graph.edge("swift_app", "options", attrs! { "label" => "configure" });
    graph.edge("llm_inf", "task_runner", attrs! { "label" => "C++ bridge" });
    graph.edge("options", "task_runner", attrs! {});
    graph.edge("task_runner", "tflite", attrs! { "label" => "load .task model" });
    graph.edge("tflite", "xnn_del", attrs! { "label" => "delegate ops" });
    graph.edge("tflite", "kleidi_del", attrs! { "label" => "delegate matmul" });

    graph.edge("xnn_del", "neon", attrs! { "label" => "vectorized ops", "color" => "red" });
    graph.edge("xnn_del", "cores", attrs! { "label" => "thread pool", "color" => "red" });
    graph.edge("kleidi_del", "neon", attrs! { "label" => "optimized kernels", "color" => "blue" });
    graph.edge(
        "kleidi_del",
        "sme2",
        attrs! { "label" => "if available", "style" => "dashed", "color" => "blue" },
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_clusters_in_order() {
        let graph = build(&ThemeConfig::default());

        let blocks: Vec<_> = ["llm_inf", "task_runner", "xnn_del", "neon"]
            .into_iter()
            .map(|id| graph.scope(graph.get_node(id).unwrap().scope()).name().to_string())
            .collect();
        assert_eq!(
            blocks,
            vec!["cluster_wrapper", "cluster_cpp", "cluster_delegates", "cluster_hardware"]
        );
        assert_eq!(graph.node_count(), 10);
        assert_eq!(graph.edge_count(), 11);
    }
}
