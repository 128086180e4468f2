//! C6 tool descriptor table (spec §4.1, §6.1 "Tool schemas").
//!
//! Each function returns the static, process-wide [`Tool`] descriptor for
//! one of the eleven tools. Constructed once at startup by
//! [`crate::dispatch::Dispatcher::new`] and never mutated (R1: `list_tools`
//! is idempotent and order-stable).

use kgraph_mcp_core::Tool;
use serde_json::json;

fn tool(name: &str, description: &str, input_schema: serde_json::Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
        output_schema: None,
        annotations: None,
    }
}

pub fn search() -> Tool {
    tool(
        "search",
        "Search the knowledge graph for concepts, sources, or documents by free-text query.",
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "type": {"type": "string", "enum": ["concepts", "sources", "documents"], "default": "concepts"},
                "limit": {"type": "integer", "default": 10},
                "offset": {"type": "integer", "default": 0},
                "min_similarity": {"type": "number", "default": 0.7},
                "include_grounding": {"type": "boolean", "default": true},
                "include_evidence": {"type": "boolean", "default": true},
                "include_diversity": {"type": "boolean", "default": true},
                "diversity_max_hops": {"type": "integer", "default": 2}
            },
            "required": ["query"]
        }),
    )
}

pub fn concept() -> Tool {
    tool(
        "concept",
        "Inspect a single concept, its related concepts, or a connection between two concepts.",
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["details", "related", "connect"]},
                "concept_id": {"type": "string"},
                "include_grounding": {"type": "boolean", "default": true},
                "include_diversity": {"type": "boolean", "default": false},
                "diversity_max_hops": {"type": "integer", "default": 2},
                "truncate_evidence": {"type": "boolean", "default": true},
                "max_depth": {"type": "integer", "default": 2},
                "from_id": {"type": "string"},
                "to_id": {"type": "string"},
                "from_query": {"type": "string"},
                "to_query": {"type": "string"},
                "connection_mode": {"type": "string", "enum": ["exact", "semantic"], "default": "semantic"},
                "max_hops": {"type": "integer", "default": 3},
                "threshold": {"type": "number", "default": 0.75},
                "include_evidence": {"type": "boolean", "default": true}
            },
            "required": ["action"]
        }),
    )
}

pub fn ontology() -> Tool {
    tool(
        "ontology",
        "Manage ontology lifecycle, scoring, and the annealing workflow.",
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": [
                    "list", "info", "files", "create", "rename", "delete", "lifecycle",
                    "scores", "score", "score_all", "candidates", "affinity", "edges",
                    "reassign", "dissolve", "proposals", "proposal_review", "annealing_cycle"
                ]},
                "ontology_id": {"type": "string"},
                "name": {"type": "string"},
                "status": {"type": "string", "enum": ["approved", "rejected"]}
            },
            "required": ["action"]
        }),
    )
}

pub fn job() -> Tool {
    tool(
        "job",
        "Inspect and manage background ingestion/processing jobs.",
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["status", "list", "approve", "cancel", "delete", "cleanup"]},
                "job_id": {"type": "string"},
                "job_ids": {"type": "array", "items": {"type": "string"}},
                "confirm": {"type": "boolean", "default": false},
                "dry_run": {"type": "boolean", "default": true}
            },
            "required": ["action"]
        }),
    )
}

pub fn ingest() -> Tool {
    tool(
        "ingest",
        "Ingest text, files, or a directory of files into the knowledge graph.",
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["text", "inspect-file", "file", "directory"]},
                "text": {"type": "string"},
                "path": {"type": "string"},
                "paths": {"type": "array", "items": {"type": "string"}},
                "ontology": {"type": "string"},
                "auto_approve": {"type": "boolean", "default": true},
                "force": {"type": "boolean", "default": false},
                "processing_mode": {"type": "string", "enum": ["serial", "parallel"], "default": "serial"},
                "target_words": {"type": "integer", "default": 1000},
                "overlap_words": {"type": "integer", "default": 200},
                "recursive": {"type": "boolean", "default": false},
                "limit": {"type": "integer", "default": 10},
                "offset": {"type": "integer", "default": 0}
            },
            "required": ["action"]
        }),
    )
}

pub fn source() -> Tool {
    tool(
        "source",
        "Fetch metadata (and, if available, an image) for a single ingested source by id.",
        json!({
            "type": "object",
            "properties": {
                "source_id": {"type": "string"}
            },
            "required": ["source_id"]
        }),
    )
}

pub fn epistemic_status() -> Tool {
    tool(
        "epistemic_status",
        "List, inspect, or measure the epistemic status of concepts in the graph.",
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["list", "show", "measure"]},
                "concept_id": {"type": "string"},
                "sample_size": {"type": "integer", "default": 100},
                "store": {"type": "boolean", "default": true},
                "verbose": {"type": "boolean", "default": false}
            },
            "required": ["action"]
        }),
    )
}

pub fn analyze_polarity_axis() -> Tool {
    tool(
        "analyze_polarity_axis",
        "Analyze a polarity axis between two poles, optionally auto-discovering candidate concepts.",
        json!({
            "type": "object",
            "properties": {
                "positive_pole": {"type": "string"},
                "negative_pole": {"type": "string"},
                "auto_discover": {"type": "boolean", "default": true},
                "max_candidates": {"type": "integer", "default": 20},
                "max_hops": {"type": "integer", "default": 1}
            },
            "required": ["positive_pole", "negative_pole"]
        }),
    )
}

pub fn artifact() -> Tool {
    tool(
        "artifact",
        "List, inspect, or fetch the payload of a stored analysis artifact.",
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["list", "show", "payload"]},
                "artifact_id": {"type": "string"}
            },
            "required": ["action"]
        }),
    )
}

pub fn document() -> Tool {
    tool(
        "document",
        "List documents, show a document's content, or list the concepts extracted from it.",
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["list", "show", "concepts"]},
                "document_id": {"type": "string"}
            },
            "required": ["action"]
        }),
    )
}

pub fn graph() -> Tool {
    tool(
        "graph",
        "Create, edit, delete, or list concepts and edges directly, or submit a batch of such operations.",
        json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["create", "edit", "delete", "list", "queue"]},
                "entity": {"type": "string", "enum": ["concept", "edge"]},
                "concept_id": {"type": "string"},
                "edge_id": {"type": "string"},
                "from_id": {"type": "string"},
                "to_id": {"type": "string"},
                "from_label": {"type": "string"},
                "to_label": {"type": "string"},
                "category": {"type": "string", "default": "structural"},
                "confidence": {"type": "number", "default": 1.0},
                "operations": {"type": "array", "items": {"type": "object"}, "maxItems": 20},
                "continue_on_error": {"type": "boolean", "default": false}
            },
            "required": ["action"]
        }),
    )
}

/// The full, order-stable descriptor table (R1).
pub fn all() -> Vec<Tool> {
    vec![
        search(),
        concept(),
        ontology(),
        job(),
        ingest(),
        source(),
        epistemic_status(),
        analyze_polarity_axis(),
        artifact(),
        document(),
        graph(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleven_tools_are_registered() {
        assert_eq!(all().len(), 11);
    }

    #[test]
    fn list_tools_is_order_stable() {
        let first: Vec<_> = all().into_iter().map(|t| t.name).collect();
        let second: Vec<_> = all().into_iter().map(|t| t.name).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn every_action_enum_matches_the_dispatch_table() {
        let ontology_actions = ontology().input_schema["properties"]["action"]["enum"]
            .as_array()
            .unwrap()
            .len();
        assert_eq!(ontology_actions, 18);
    }
}
