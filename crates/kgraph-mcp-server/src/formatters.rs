//! C3 — response formatters (spec §4.2).
//!
//! Every function here is a pure, total `payload -> String` mapping (T3):
//! no I/O, no panics, deterministic on repeat calls with the same input.
//! Backend payloads stay opaque `serde_json::Value`s everywhere else in the
//! workspace (§9); this module is the one place that reaches into their
//! shape, and it does so defensively — a missing field renders as an
//! omitted line rather than a panic, since the backend's exact schema is
//! outside this crate's control.

use serde_json::Value;

use crate::segmenter::{segment_path, PathSegment};

/// Renders a float with two-decimal precision unless it is exactly
/// integral, per §4.2's formatting rules.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Signed percentage, e.g. `+72%` or `-14%`.
pub fn format_signed_percent(value: f64) -> String {
    let pct = (value * 100.0).round() as i64;
    if pct >= 0 {
        format!("+{pct}%")
    } else {
        format!("{pct}%")
    }
}

/// Qualitative grounding band for a signed scalar in `[-1, 1]` (§4.2).
pub fn grounding_band(grounding: f64) -> &'static str {
    if grounding > 0.7 {
        "Well-supported"
    } else if grounding >= 0.3 {
        "Moderate"
    } else if grounding >= 0.0 {
        "Unexplored/Tentative"
    } else if grounding >= -0.3 {
        "Contested"
    } else {
        "Contradicted"
    }
}

/// The "authenticated diversity" glyph: sign-of-grounding combined with
/// diversity magnitude (§4.2, glossary).
pub fn authenticated_diversity_glyph(grounding: f64, diversity: f64) -> &'static str {
    if grounding > 0.7 && diversity >= 0.5 {
        "✅"
    } else if grounding > 0.3 && diversity >= 0.25 {
        "✓"
    } else if grounding >= 0.0 {
        "⚠"
    } else {
        "❌"
    }
}

fn grounding_line(grounding: f64) -> String {
    format!(
        "Grounding: {} ({})",
        format_signed_percent(grounding),
        grounding_band(grounding)
    )
}

fn diversity_line(grounding: f64, diversity: f64) -> String {
    format!(
        "Diversity: {}% {}",
        format_number(diversity * 100.0),
        authenticated_diversity_glyph(grounding, diversity)
    )
}

fn get_f64(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

fn get_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn items<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    payload.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// `search` tool (§4.1, B1: must handle an empty result list without error).
pub fn format_search_results(payload: &Value, kind: &str) -> String {
    let results = items(payload, "results");
    if results.is_empty() {
        return format!(
            "No {kind} found.\nHint: try a lower `min_similarity` threshold or a broader query."
        );
    }

    let mut out = format!("# Search results ({kind})\n---\n");
    for (i, item) in results.iter().enumerate() {
        let name = get_str(item, "name").or_else(|| get_str(item, "title")).unwrap_or("(unnamed)");
        out.push_str(&format!("{}. {name}\n", i + 1));
        if let Some(similarity) = get_f64(item, "similarity") {
            out.push_str(&format!("   Similarity: {}\n", format_number(similarity)));
        }
        if let Some(grounding) = get_f64(item, "grounding") {
            out.push_str(&format!("   {}\n", grounding_line(grounding)));
            if let Some(diversity) = get_f64(item, "diversity") {
                out.push_str(&format!("   {}\n", diversity_line(grounding, diversity)));
            }
        }
    }
    out
}

/// `concept/details`.
pub fn format_concept_details(payload: &Value, truncate_evidence: bool) -> String {
    let name = get_str(payload, "name").unwrap_or("(unknown concept)");
    let mut out = format!("# Concept: {name}\n---\n");
    if let Some(grounding) = get_f64(payload, "grounding") {
        out.push_str(&format!("{}\n", grounding_line(grounding)));
        if let Some(diversity) = get_f64(payload, "diversity") {
            out.push_str(&format!("{}\n", diversity_line(grounding, diversity)));
        }
    }
    for evidence in items(payload, "evidence") {
        let quote = get_str(evidence, "quote").unwrap_or("");
        out.push_str(&format!("- \"{quote}\"\n"));
        if let Some(full_text) = get_str(evidence, "full_text") {
            let rendered = if truncate_evidence && full_text.chars().count() > 200 {
                format!("{}…", full_text.chars().take(200).collect::<String>())
            } else {
                full_text.to_string()
            };
            out.push_str(&format!("  {rendered}\n"));
        }
    }
    out
}

/// `concept/related`.
pub fn format_related_concepts(payload: &Value) -> String {
    let related = items(payload, "related");
    if related.is_empty() {
        return "No related concepts found.\nHint: try increasing `max_depth`.".to_string();
    }
    let mut out = String::from("# Related concepts\n---\n");
    for entry in related {
        let name = get_str(entry, "name").unwrap_or("(unnamed)");
        let depth = entry.get("depth").and_then(Value::as_u64).unwrap_or(0);
        out.push_str(&format!("- {name} (depth {depth})\n"));
    }
    out
}

/// `concept/connect`. Applies path segmentation (C4) to each path in the
/// payload before rendering only in `exact` mode, per §4.1 step 6 ("for
/// `concept/connect` in `exact` mode whose result contains paths...").
pub fn format_connection(payload: &Value, mode: &str, segment: bool) -> String {
    let paths = items(payload, "paths");
    if paths.is_empty() {
        return format!(
            "No connection found ({mode} mode).\nHint: raise `max_hops` or lower `threshold`."
        );
    }

    let mut out = format!("# Connection ({mode})\n---\n");
    for (i, path) in paths.iter().enumerate() {
        let nodes: Vec<String> = items(path, "nodes")
            .iter()
            .map(|n| get_str(n, "label").unwrap_or("?").to_string())
            .collect();
        out.push_str(&format!("Path {}:\n", i + 1));
        if segment {
            let segments: Vec<PathSegment<String>> = segment_path(&nodes);
            for (j, segment) in segments.iter().enumerate() {
                out.push_str(&format!(
                    "  Segment {}: {} ({} relationships)\n",
                    j + 1,
                    segment.nodes.join(" -> "),
                    segment.relationship_count
                ));
            }
        } else {
            out.push_str(&format!("  {}\n", nodes.join(" -> ")));
        }
    }
    out
}

/// Generic record-list formatter used by the `ontology`, `job`, `epistemic_status`,
/// `artifact`, and `document` actions whose shapes are simple label/value
/// tables rather than grounding-scored results.
pub fn format_record_list(heading: &str, list_key: &str, payload: &Value) -> String {
    let records = items(payload, list_key);
    if records.is_empty() {
        return format!("No {heading} found.");
    }
    let mut out = format!("# {heading}\n---\n");
    for record in records {
        if let Value::Object(map) = record {
            let line = map
                .iter()
                .map(|(k, v)| format!("{k}={}", render_scalar(v)))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("- {line}\n"));
        }
    }
    out
}

/// Generic single-record formatter, used by `ontology/info`, `job/status`,
/// `document/show`, `artifact/show`, `epistemic_status/show`, and the
/// database/system resources.
pub fn format_record(heading: &str, payload: &Value) -> String {
    let mut out = format!("# {heading}\n---\n");
    if let Value::Object(map) = payload {
        for (key, value) in map {
            out.push_str(&format!("{key}: {}\n", render_scalar(value)));
        }
    } else {
        out.push_str(&render_scalar(payload));
        out.push('\n');
    }
    out
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// `ingest/text`, `ingest/file` success summary.
pub fn format_ingest_result(payload: &Value) -> String {
    let job_id = get_str(payload, "job_id").unwrap_or("(pending)");
    let status = get_str(payload, "status").unwrap_or("accepted");
    format!("# Ingest accepted\n---\nJob: {job_id}\nStatus: {status}\n")
}

/// `ingest/file` batch summary (array input, §4.1.1).
pub fn format_ingest_batch(payload: &Value) -> String {
    let successes = items(payload, "succeeded").len();
    let failures = items(payload, "failed");
    let mut out = format!(
        "# Ingest batch\n---\n{successes} succeeded, {} failed\n",
        failures.len()
    );
    for failure in failures {
        let path = get_str(failure, "path").unwrap_or("(unknown)");
        let error = get_str(failure, "error").unwrap_or("unknown error");
        out.push_str(&format!("- {path}: {error}\n"));
    }
    out
}

/// `ingest/directory` — spec §9 Open Question #1: the reference
/// implementation returns a placeholder after collecting file paths, and
/// the specification mandates keeping that contract for behavioral parity.
pub fn format_not_implemented(paths_collected: usize) -> String {
    format!(
        "# Ingest directory\n---\nnot_implemented (collected {paths_collected} candidate file(s); \
         submit them individually via `ingest/file`)\n"
    )
}

/// `source` tool, text branch (metadata only).
pub fn format_source_metadata(payload: &Value) -> String {
    format_record("Source", payload)
}

/// `analyze_polarity_axis`.
pub fn format_polarity(payload: &Value) -> String {
    let mut out = String::from("# Polarity analysis\n---\n");
    for candidate in items(payload, "candidates") {
        let name = get_str(candidate, "name").unwrap_or("(unnamed)");
        let score = get_f64(candidate, "score").unwrap_or(0.0);
        out.push_str(&format!("- {name}: {}\n", format_number(score)));
    }
    if items(payload, "candidates").is_empty() {
        out.push_str("No candidates discovered.\nHint: raise `max_candidates` or `max_hops`.\n");
    }
    out
}

/// `graph/queue` — summarizes each operation in input order (§4.1.2,
/// Scenario 5). `results[i]` is `None` for a skipped operation.
pub fn format_queue_summary(results: &[QueueOpOutcome]) -> String {
    let mut out = String::from("# Graph queue\n---\n");
    for (i, outcome) in results.iter().enumerate() {
        let line = match outcome {
            QueueOpOutcome::Success(detail) => format!("success — {detail}"),
            QueueOpOutcome::Failed(reason) => format!("error — {reason}"),
            QueueOpOutcome::Skipped => "skipped".to_string(),
        };
        out.push_str(&format!("{}. {line}\n", i + 1));
    }
    out
}

/// Outcome of one `graph/queue` operation, used by [`format_queue_summary`].
#[derive(Debug, Clone)]
pub enum QueueOpOutcome {
    Success(String),
    Failed(String),
    Skipped,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grounding_bands_match_boundaries() {
        assert_eq!(grounding_band(0.71), "Well-supported");
        assert_eq!(grounding_band(0.7), "Moderate");
        assert_eq!(grounding_band(0.3), "Moderate");
        assert_eq!(grounding_band(0.29), "Unexplored/Tentative");
        assert_eq!(grounding_band(0.0), "Unexplored/Tentative");
        assert_eq!(grounding_band(-0.1), "Contested");
        assert_eq!(grounding_band(-0.31), "Contradicted");
    }

    #[test]
    fn signed_percent_renders_sign() {
        assert_eq!(format_signed_percent(0.72), "+72%");
        assert_eq!(format_signed_percent(-0.14), "-14%");
        assert_eq!(format_signed_percent(0.0), "+0%");
    }

    #[test]
    fn number_format_drops_decimals_only_when_integral() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(10.5), "10.50");
        assert_eq!(format_number(0.723), "0.72");
    }

    #[test]
    fn empty_search_results_format_without_error() {
        let out = format_search_results(&json!({"results": []}), "concepts");
        assert!(out.contains("No concepts found"));
    }

    #[test]
    fn formatter_is_pure_and_deterministic() {
        let payload = json!({"results": [{"name": "A", "similarity": 0.9, "grounding": 0.8, "diversity": 0.6}]});
        let first = format_search_results(&payload, "concepts");
        let second = format_search_results(&payload, "concepts");
        assert_eq!(first, second);
    }

    #[test]
    fn evidence_truncation_clamps_by_characters_not_bytes() {
        // Each "é" is a 2-byte UTF-8 char; a byte-index slice at 200 would
        // land inside the 100th character and panic. 250 chars, all
        // multibyte, so `full_text.len()` (500 bytes) is nowhere near a
        // char boundary at the 200-*character* truncation point.
        let full_text: String = std::iter::repeat('é').take(250).collect();
        assert_eq!(full_text.len(), 500);
        let payload = json!({
            "name": "X",
            "evidence": [{"quote": "q", "full_text": full_text}],
        });

        let out = format_concept_details(&payload, true);
        let truncated: String = std::iter::repeat('é').take(200).collect();
        assert!(out.contains(&format!("{truncated}…")));
    }

    #[test]
    fn quote_is_never_truncated_only_full_text_is() {
        let long_quote: String = std::iter::repeat('x').take(500).collect();
        let payload = json!({
            "name": "X",
            "evidence": [{"quote": long_quote.clone()}],
        });
        let out = format_concept_details(&payload, true);
        assert!(out.contains(&long_quote));
    }

    #[test]
    fn connection_formatting_segments_long_paths() {
        let nodes: Vec<Value> = (0..12).map(|i| json!({"label": format!("n{i}")})).collect();
        let payload = json!({"paths": [{"nodes": nodes}]});
        let out = format_connection(&payload, "exact", true);
        assert!(out.contains("Segment 1"));
        assert!(out.contains("Segment 3"));
    }
}
