//! C6 — tool registry and action-routing engine (spec §4.1).
//!
//! The dispatcher is stateless across requests (§4.1.3): every call takes
//! the shared [`AppState`] plus the request's own arguments and returns a
//! [`ToolCallResponse`]. Nothing here ever propagates an error past
//! [`call_tool`] itself — step 9 of the dispatch algorithm catches every
//! failure from steps 2-7 and wraps it into the `{error, details}` envelope.

use std::collections::HashSet;
use std::path::Path;

use kgraph_mcp_backend::types::*;
use kgraph_mcp_core::{ToolCallResponse, ToolContent};
use serde_json::{json, Value};

use crate::context::AppState;
use crate::error::{AllowlistError, DispatchError};
use crate::formatters::*;

/// Entry point bound to `tools/call` by the protocol adapter (C8). Never
/// returns an `Err` — failures become an `is_error` response (§4.1 step 9, T7).
///
/// `request_id` is the adapter's tracked cancellation key for this dispatch
/// (§5); only `graph/queue` consults it, between operations, since it is the
/// one action that issues more than one backend call per dispatch.
pub async fn call_tool(
    state: &AppState,
    name: &str,
    args: Option<Value>,
    request_id: Option<&Value>,
) -> ToolCallResponse {
    let args = args.unwrap_or_else(|| json!({}));
    let outcome = match name {
        "search" => dispatch_search(state, &args).await,
        "concept" => dispatch_concept(state, &args).await,
        "ontology" => dispatch_ontology(state, &args).await,
        "job" => dispatch_job(state, &args).await,
        "ingest" => dispatch_ingest(state, &args).await,
        "source" => dispatch_source(state, &args).await,
        "epistemic_status" => dispatch_epistemic_status(state, &args).await,
        "analyze_polarity_axis" => dispatch_polarity(state, &args).await,
        "artifact" => dispatch_artifact(state, &args).await,
        "document" => dispatch_document(state, &args).await,
        "graph" => dispatch_graph(state, &args, request_id).await,
        other => Err(DispatchError::UnknownTool(other.to_string())),
    };

    match outcome {
        Ok(content) => ToolCallResponse {
            content,
            is_error: None,
        },
        Err(err) => ToolCallResponse {
            content: vec![ToolContent::Text {
                text: serde_json::to_string(&err.into_envelope()).unwrap_or_default(),
            }],
            is_error: Some(true),
        },
    }
}

fn text(body: String) -> Vec<ToolContent> {
    vec![ToolContent::Text { text: body }]
}

// ---- argument helpers --------------------------------------------------
//
// `absent` (missing key or explicit `null`) triggers the default; explicit
// `false`/`0`/`""` is honored (spec §4.1.2, §9's "nullable/absent defaults").

fn arg_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

fn arg_str_req<'a>(args: &'a Value, key: &str) -> Result<&'a str, DispatchError> {
    arg_str(args, key).filter(|s| !s.is_empty()).ok_or_else(|| {
        DispatchError::Validation(format!("missing required field: {key}"))
    })
}

fn arg_bool(args: &Value, key: &str, default: bool) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn arg_u32(args: &Value, key: &str, default: u32) -> u32 {
    args.get(key).and_then(Value::as_u64).map(|v| v as u32).unwrap_or(default)
}

fn arg_f64(args: &Value, key: &str, default: f64) -> f64 {
    args.get(key).and_then(Value::as_f64).unwrap_or(default)
}

fn arg_str_owned(args: &Value, key: &str, default: &str) -> String {
    arg_str(args, key).unwrap_or(default).to_string()
}

/// Shallow-clones `args` with `exclude` keys removed — used to forward the
/// rest of the request object as a backend body for pass-through actions.
fn body_without(args: &Value, exclude: &[&str]) -> Value {
    match args.as_object() {
        Some(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| !exclude.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        None => json!({}),
    }
}

fn validate_path(state: &AppState, raw: &str) -> Result<String, DispatchError> {
    let result = state.allowlist.validate_path(raw);
    if result.allowed {
        Ok(result.resolved_absolute)
    } else {
        Err(DispatchError::PathDenied(AllowlistError::Denied {
            reason: result.reason.unwrap_or_else(|| "not allowed".to_string()),
            hint: result.hint,
            resolved_absolute: result.resolved_absolute,
        }))
    }
}

fn validate_directory(state: &AppState, raw: &str) -> Result<String, DispatchError> {
    let result = state.allowlist.validate_directory(raw);
    if result.allowed {
        Ok(result.resolved_absolute)
    } else {
        Err(DispatchError::PathDenied(AllowlistError::Denied {
            reason: result.reason.unwrap_or_else(|| "not allowed".to_string()),
            hint: result.hint,
            resolved_absolute: result.resolved_absolute,
        }))
    }
}

// ---- search -------------------------------------------------------------

async fn dispatch_search(state: &AppState, args: &Value) -> Result<Vec<ToolContent>, DispatchError> {
    let query = arg_str_req(args, "query")?;
    let kind = arg_str(args, "type").unwrap_or("concepts");

    let params = SearchParams {
        query: query.to_string(),
        limit: arg_u32(args, "limit", 10),
        min_similarity: Some(arg_f64(args, "min_similarity", 0.7)),
        offset: arg_u32(args, "offset", 0),
        include_grounding: Some(arg_bool(args, "include_grounding", true)),
        include_evidence: Some(arg_bool(args, "include_evidence", true)),
        include_diversity: Some(arg_bool(args, "include_diversity", true)),
        diversity_max_hops: Some(arg_u32(args, "diversity_max_hops", 2)),
    };

    let payload = match kind {
        "concepts" => state.backend.search_concepts(&params).await?,
        "sources" => state.backend.search_sources(&params).await?,
        "documents" => state.backend.search_documents(&params).await?,
        other => {
            return Err(DispatchError::UnknownAction {
                tool: "search".to_string(),
                action: other.to_string(),
            })
        }
    };

    Ok(text(format_search_results(&payload, kind)))
}

// ---- concept --------------------------------------------------------------

async fn dispatch_concept(state: &AppState, args: &Value) -> Result<Vec<ToolContent>, DispatchError> {
    let action = arg_str_req(args, "action")?;
    match action {
        "details" => {
            let concept_id = arg_str_req(args, "concept_id")?.to_string();
            let truncate_evidence = arg_bool(args, "truncate_evidence", true);
            let params = ConceptDetailsParams {
                concept_id,
                include_grounding: arg_bool(args, "include_grounding", true),
                include_diversity: arg_bool(args, "include_diversity", false),
                diversity_max_hops: arg_u32(args, "diversity_max_hops", 2),
                truncate_evidence,
            };
            let payload = state.backend.get_concept_details(&params).await?;
            Ok(text(format_concept_details(&payload, truncate_evidence)))
        }
        "related" => {
            let params = RelatedConceptsParams {
                concept_id: arg_str_req(args, "concept_id")?.to_string(),
                max_depth: arg_u32(args, "max_depth", 2),
            };
            let payload = state.backend.find_related_concepts(&params).await?;
            Ok(text(format_related_concepts(&payload)))
        }
        "connect" => {
            let mode = arg_str(args, "connection_mode").unwrap_or("semantic");
            let include_grounding = arg_bool(args, "include_grounding", true);
            let include_evidence = arg_bool(args, "include_evidence", true);
            let max_hops = arg_u32(args, "max_hops", 3);

            let payload = match mode {
                "exact" => {
                    let params = ConnectExactParams {
                        from_id: arg_str_req(args, "from_id")?.to_string(),
                        to_id: arg_str_req(args, "to_id")?.to_string(),
                        max_hops,
                        include_grounding,
                        include_evidence,
                    };
                    state.backend.find_connection(&params).await?
                }
                "semantic" => {
                    let params = ConnectSemanticParams {
                        from_query: arg_str_req(args, "from_query")?.to_string(),
                        to_query: arg_str_req(args, "to_query")?.to_string(),
                        max_hops,
                        threshold: arg_f64(args, "threshold", 0.75),
                        include_grounding,
                        include_evidence,
                    };
                    state.backend.find_connection_by_search(&params).await?
                }
                other => {
                    return Err(DispatchError::Validation(format!(
                        "Unknown connection_mode: {other}"
                    )))
                }
            };

            Ok(text(format_connection(&payload, mode, mode == "exact")))
        }
        other => Err(DispatchError::UnknownAction {
            tool: "concept".to_string(),
            action: other.to_string(),
        }),
    }
}

// ---- ontology --------------------------------------------------------------

async fn dispatch_ontology(state: &AppState, args: &Value) -> Result<Vec<ToolContent>, DispatchError> {
    let action = arg_str_req(args, "action")?;
    let backend = &state.backend;

    let payload = match action {
        "list" => backend.ontology_list().await?,
        "info" => backend.ontology_info(arg_str_req(args, "ontology_id")?).await?,
        "files" => backend.ontology_files(arg_str_req(args, "ontology_id")?).await?,
        "create" => {
            let name = arg_str_req(args, "name")?;
            backend.ontology_create(&json!({ "name": name })).await?
        }
        "rename" => {
            let id = arg_str_req(args, "ontology_id")?;
            let name = arg_str_req(args, "name")?;
            backend.ontology_rename(id, &json!({ "name": name })).await?
        }
        "delete" => backend.ontology_delete(arg_str_req(args, "ontology_id")?).await?,
        "lifecycle" => {
            let id = arg_str_req(args, "ontology_id")?;
            backend
                .ontology_lifecycle(id, &body_without(args, &["action", "ontology_id"]))
                .await?
        }
        "scores" => backend.ontology_scores(arg_str_req(args, "ontology_id")?).await?,
        "score" => {
            let id = arg_str_req(args, "ontology_id")?;
            backend.ontology_score(id, &body_without(args, &["action", "ontology_id"])).await?
        }
        "score_all" => backend.ontology_score_all().await?,
        "candidates" => backend.ontology_candidates(arg_str_req(args, "ontology_id")?).await?,
        "affinity" => {
            let id = arg_str_req(args, "ontology_id")?;
            backend
                .ontology_affinity(id, &body_without(args, &["action", "ontology_id"]))
                .await?
        }
        "edges" => backend.ontology_edges(arg_str_req(args, "ontology_id")?).await?,
        "reassign" => backend.ontology_reassign(&body_without(args, &["action"])).await?,
        "dissolve" => backend.ontology_dissolve(arg_str_req(args, "ontology_id")?).await?,
        "proposals" => backend.ontology_proposals(arg_str_req(args, "ontology_id")?).await?,
        "proposal_review" => {
            let proposal_id = arg_str_req(args, "ontology_id")?;
            let status = arg_str_req(args, "status")?;
            if status != "approved" && status != "rejected" {
                return Err(DispatchError::Validation(format!(
                    "status must be 'approved' or 'rejected', got '{status}'"
                )));
            }
            backend
                .ontology_review_proposal(proposal_id, &json!({ "status": status }))
                .await?
        }
        "annealing_cycle" => {
            backend.ontology_trigger_annealing_cycle(&body_without(args, &["action"])).await?
        }
        other => {
            return Err(DispatchError::UnknownAction {
                tool: "ontology".to_string(),
                action: other.to_string(),
            })
        }
    };

    Ok(text(format_record_or_list(action, &payload)))
}

/// Ontology/job responses are sometimes a single record, sometimes a list
/// under a well-known key; routes to the right generic formatter.
fn format_record_or_list(action: &str, payload: &Value) -> String {
    const LIST_ACTIONS: &[(&str, &str)] = &[
        ("list", "ontologies"),
        ("files", "files"),
        ("scores", "scores"),
        ("candidates", "candidates"),
        ("edges", "edges"),
        ("proposals", "proposals"),
    ];
    if let Some((_, key)) = LIST_ACTIONS.iter().find(|(a, _)| *a == action) {
        format_record_list(&format!("Ontology {action}"), key, payload)
    } else {
        format_record(&format!("Ontology {action}"), payload)
    }
}

// ---- job --------------------------------------------------------------

async fn dispatch_job(state: &AppState, args: &Value) -> Result<Vec<ToolContent>, DispatchError> {
    let action = arg_str_req(args, "action")?;
    let backend = &state.backend;

    match action {
        "status" => {
            let payload = backend.get_job_status(arg_str_req(args, "job_id")?).await?;
            Ok(text(format_record("Job status", &payload)))
        }
        "list" => {
            let payload = backend.list_jobs(&body_without(args, &["action"])).await?;
            Ok(text(format_record_list("Jobs", "jobs", &payload)))
        }
        "approve" => {
            let payload = backend.approve_job(arg_str_req(args, "job_id")?).await?;
            Ok(text(format_record("Job approved", &payload)))
        }
        "cancel" => {
            let payload = backend.cancel_job(arg_str_req(args, "job_id")?).await?;
            Ok(text(format_record("Job cancelled", &payload)))
        }
        "delete" => {
            if let Some(ids) = args.get("job_ids").and_then(Value::as_array) {
                let payload = backend.delete_jobs(&json!({ "job_ids": ids })).await?;
                Ok(text(format_record("Jobs deleted", &payload)))
            } else {
                let payload = backend.delete_job(arg_str_req(args, "job_id")?).await?;
                Ok(text(format_record("Job deleted", &payload)))
            }
        }
        "cleanup" => {
            // R2: `confirm=false` forwards `dry_run=true` regardless of the
            // caller's own `dry_run` field.
            let confirm = arg_bool(args, "confirm", false);
            let dry_run = !confirm;
            let payload = backend.delete_jobs(&json!({ "dry_run": dry_run, "cleanup": true })).await?;
            Ok(text(format_record("Job cleanup", &payload)))
        }
        other => Err(DispatchError::UnknownAction {
            tool: "job".to_string(),
            action: other.to_string(),
        }),
    }
}

// ---- ingest --------------------------------------------------------------

const KNOWN_INGEST_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".pdf", ".docx", ".png", ".jpg", ".jpeg", ".csv", ".json", ".html",
];

async fn dispatch_ingest(state: &AppState, args: &Value) -> Result<Vec<ToolContent>, DispatchError> {
    let action = arg_str_req(args, "action")?;
    match action {
        "text" => {
            let params = IngestTextParams {
                ontology: arg_str_req(args, "ontology")?.to_string(),
                text: arg_str_req(args, "text")?.to_string(),
                auto_approve: arg_bool(args, "auto_approve", true),
                force: arg_bool(args, "force", false),
                processing_mode: arg_str_owned(args, "processing_mode", "serial"),
                target_words: arg_u32(args, "target_words", 1000),
                overlap_words: arg_u32(args, "overlap_words", 200),
                source_type: "mcp",
            };
            let payload = state.backend.ingest_text(&params).await?;
            Ok(text(format_ingest_result(&payload)))
        }
        "inspect-file" => {
            let raw = arg_str_req(args, "path")?;
            let resolved = validate_path(state, raw)?;
            let path = Path::new(&resolved);
            let extension = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                .unwrap_or_default();
            // Open Question #3: set-membership, not the source's truthy-lookup.
            let known_extensions: HashSet<&str> = KNOWN_INGEST_EXTENSIONS.iter().copied().collect();
            let supported = known_extensions.contains(extension.as_str());
            let mime = mime_guess::from_path(path).first_or_octet_stream().to_string();
            let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            Ok(text(format_record(
                "Inspected file",
                &json!({
                    "resolved_path": resolved,
                    "extension": extension,
                    "mime_type": mime,
                    "size_bytes": size_bytes,
                    "supported": supported,
                }),
            )))
        }
        "file" => {
            if let Some(paths) = args.get("paths").and_then(Value::as_array) {
                dispatch_ingest_file_batch(state, args, paths).await
            } else {
                let raw = arg_str_req(args, "path")?;
                let resolved = validate_path(state, raw)?;
                let params = IngestFileParams {
                    ontology: arg_str_req(args, "ontology")?.to_string(),
                    path: resolved,
                    auto_approve: arg_bool(args, "auto_approve", true),
                    force: arg_bool(args, "force", false),
                };
                let payload = state.backend.ingest_file(&params).await?;
                Ok(text(format_ingest_result(&payload)))
            }
        }
        "directory" => {
            let raw = arg_str_req(args, "path")?;
            let resolved = validate_directory(state, raw)?;
            let ontology = arg_str(args, "ontology")
                .map(str::to_string)
                .unwrap_or_else(|| {
                    Path::new(&resolved)
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "default".to_string())
                });
            let recursive = arg_bool(args, "recursive", false);
            let limit = arg_u32(args, "limit", 10) as usize;
            let offset = arg_u32(args, "offset", 0) as usize;

            let mut walker = walkdir::WalkDir::new(&resolved);
            if !recursive {
                walker = walker.max_depth(1);
            }
            let collected: Vec<String> = walker
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .skip(offset)
                .take(limit)
                .map(|e| e.path().to_string_lossy().to_string())
                .collect();
            let _ = ontology; // forwarded to the backend once directory ingest is implemented

            // Open Question #1: the reference implementation returns this
            // placeholder after collecting candidate paths; kept for parity.
            Ok(text(format_not_implemented(collected.len())))
        }
        other => Err(DispatchError::UnknownAction {
            tool: "ingest".to_string(),
            action: other.to_string(),
        }),
    }
}

async fn dispatch_ingest_file_batch(
    state: &AppState,
    args: &Value,
    paths: &[Value],
) -> Result<Vec<ToolContent>, DispatchError> {
    let ontology = arg_str_req(args, "ontology")?.to_string();
    let auto_approve = arg_bool(args, "auto_approve", true);
    let force = arg_bool(args, "force", false);

    let mut succeeded = Vec::new();
    let mut failed = Vec::new();

    for path_value in paths {
        let Some(raw) = path_value.as_str() else {
            failed.push(json!({"path": path_value, "error": "path is not a string"}));
            continue;
        };
        match validate_path(state, raw) {
            Ok(resolved) => {
                let params = IngestFileParams {
                    ontology: ontology.clone(),
                    path: resolved,
                    auto_approve,
                    force,
                };
                match state.backend.ingest_file(&params).await {
                    Ok(result) => succeeded.push(result),
                    Err(err) => failed.push(json!({"path": raw, "error": err.to_string()})),
                }
            }
            Err(err) => failed.push(json!({"path": raw, "error": err.to_string()})),
        }
    }

    Ok(text(format_ingest_batch(&json!({
        "succeeded": succeeded,
        "failed": failed,
    }))))
}

// ---- source --------------------------------------------------------------

async fn dispatch_source(state: &AppState, args: &Value) -> Result<Vec<ToolContent>, DispatchError> {
    let source_id = arg_str_req(args, "source_id")?;
    let metadata = match state.backend.get_source_metadata(source_id).await {
        Ok(payload) => payload,
        Err(err) if err.is_not_found() => {
            return Err(DispatchError::SourceNotFound(source_id.to_string()))
        }
        Err(err) => return Err(err.into()),
    };

    let has_image = metadata.get("has_image").and_then(Value::as_bool).unwrap_or(false);
    if has_image {
        let image = state.backend.get_source_image_base64(source_id).await?;
        let data = image.get("data").and_then(Value::as_str).unwrap_or("").to_string();
        let mime_type = image
            .get("mime_type")
            .and_then(Value::as_str)
            .unwrap_or("image/png")
            .to_string();
        Ok(vec![
            ToolContent::Image { data, mime_type },
            ToolContent::Text {
                text: format_source_metadata(&metadata),
            },
        ])
    } else {
        Ok(text(format_source_metadata(&metadata)))
    }
}

// ---- epistemic_status --------------------------------------------------------------

async fn dispatch_epistemic_status(
    state: &AppState,
    args: &Value,
) -> Result<Vec<ToolContent>, DispatchError> {
    let action = arg_str_req(args, "action")?;
    let backend = &state.backend;
    match action {
        "list" => {
            let payload = backend.epistemic_list().await?;
            Ok(text(format_record_list("Epistemic status", "items", &payload)))
        }
        "show" => {
            let payload = backend.epistemic_show(arg_str_req(args, "concept_id")?).await?;
            Ok(text(format_record("Epistemic status", &payload)))
        }
        "measure" => {
            let body = json!({
                "concept_id": arg_str(args, "concept_id"),
                "sample_size": arg_u32(args, "sample_size", 100),
                "store": arg_bool(args, "store", true),
                "verbose": arg_bool(args, "verbose", false),
            });
            let payload = backend.epistemic_measure(&body).await?;
            Ok(text(format_record("Epistemic measurement", &payload)))
        }
        other => Err(DispatchError::UnknownAction {
            tool: "epistemic_status".to_string(),
            action: other.to_string(),
        }),
    }
}

// ---- analyze_polarity_axis --------------------------------------------------------------

async fn dispatch_polarity(state: &AppState, args: &Value) -> Result<Vec<ToolContent>, DispatchError> {
    let body = json!({
        "positive_pole": arg_str_req(args, "positive_pole")?,
        "negative_pole": arg_str_req(args, "negative_pole")?,
        "auto_discover": arg_bool(args, "auto_discover", true),
        "max_candidates": arg_u32(args, "max_candidates", 20),
        "max_hops": arg_u32(args, "max_hops", 1),
    });
    let payload = state.backend.analyze_polarity_axis(&body).await?;
    Ok(text(format_polarity(&payload)))
}

// ---- artifact --------------------------------------------------------------

async fn dispatch_artifact(state: &AppState, args: &Value) -> Result<Vec<ToolContent>, DispatchError> {
    let action = arg_str_req(args, "action")?;
    let backend = &state.backend;
    match action {
        "list" => Ok(text(format_record_list("Artifacts", "artifacts", &backend.artifact_list().await?))),
        "show" => Ok(text(format_record(
            "Artifact",
            &backend.artifact_show(arg_str_req(args, "artifact_id")?).await?,
        ))),
        "payload" => Ok(text(format_record(
            "Artifact payload",
            &backend.artifact_payload(arg_str_req(args, "artifact_id")?).await?,
        ))),
        other => Err(DispatchError::UnknownAction {
            tool: "artifact".to_string(),
            action: other.to_string(),
        }),
    }
}

// ---- document --------------------------------------------------------------

async fn dispatch_document(state: &AppState, args: &Value) -> Result<Vec<ToolContent>, DispatchError> {
    let action = arg_str_req(args, "action")?;
    let backend = &state.backend;
    match action {
        "list" => Ok(text(format_record_list("Documents", "documents", &backend.document_list().await?))),
        "show" => Ok(text(format_record(
            "Document",
            &backend.document_show(arg_str_req(args, "document_id")?).await?,
        ))),
        "concepts" => Ok(text(format_record_list(
            "Document concepts",
            "concepts",
            &backend.document_concepts(arg_str_req(args, "document_id")?).await?,
        ))),
        other => Err(DispatchError::UnknownAction {
            tool: "document".to_string(),
            action: other.to_string(),
        }),
    }
}

// ---- graph --------------------------------------------------------------

async fn dispatch_graph(
    state: &AppState,
    args: &Value,
    request_id: Option<&Value>,
) -> Result<Vec<ToolContent>, DispatchError> {
    let action = arg_str_req(args, "action")?;

    if action == "queue" {
        return dispatch_graph_queue(state, args, request_id).await;
    }

    let entity = arg_str_req(args, "entity")?;
    if entity != "concept" && entity != "edge" {
        return Err(DispatchError::Validation(format!(
            "entity must be 'concept' or 'edge', got '{entity}'"
        )));
    }

    let backend = &state.backend;
    let payload = match action {
        "create" => {
            let mut body = body_without(args, &["action", "entity"]);
            if entity == "edge" {
                let obj = body.as_object_mut().expect("body is always an object");
                obj.entry("category").or_insert_with(|| Value::String("structural".to_string()));
                obj.entry("confidence").or_insert_with(|| json!(1.0));
            }
            backend.graph_create(entity, &body).await?
        }
        "edit" => {
            let id = arg_str_req(args, if entity == "concept" { "concept_id" } else { "edge_id" })?;
            let body = body_without(args, &["action", "entity", "concept_id", "edge_id"]);
            backend.graph_edit(entity, id, &body).await?
        }
        "delete" => {
            let id = arg_str_req(args, if entity == "concept" { "concept_id" } else { "edge_id" })?;
            backend.graph_delete(entity, id).await?
        }
        "list" => backend.graph_list(entity, &body_without(args, &["action", "entity"])).await?,
        other => {
            return Err(DispatchError::UnknownAction {
                tool: "graph".to_string(),
                action: other.to_string(),
            })
        }
    };

    Ok(text(format_record_list_or_record(action, &payload)))
}

fn format_record_list_or_record(action: &str, payload: &Value) -> String {
    if action == "list" {
        format_record_list("Graph entities", "items", payload)
    } else {
        format_record(&format!("Graph {action}"), payload)
    }
}

async fn dispatch_graph_queue(
    state: &AppState,
    args: &Value,
    request_id: Option<&Value>,
) -> Result<Vec<ToolContent>, DispatchError> {
    let operations = args
        .get("operations")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if operations.is_empty() {
        return Err(DispatchError::Validation(
            "operations array cannot be empty".to_string(),
        ));
    }
    if operations.len() > 20 {
        return Err(DispatchError::Validation(format!(
            "Queue too large: {} operations (max 20)",
            operations.len()
        )));
    }
    for op in &operations {
        if arg_str(op, "op").is_none() || arg_str(op, "entity").is_none() {
            return Err(DispatchError::Validation(
                "each queue operation requires 'op' and 'entity'".to_string(),
            ));
        }
    }

    let continue_on_error = arg_bool(args, "continue_on_error", false);
    let mut outcomes = Vec::with_capacity(operations.len());
    let mut halted = false;

    for op in &operations {
        // §5: the transport closing mid-dispatch abandons pending-but-not-
        // started queue operations; a `notifications/cancelled` for this
        // dispatch's request id does the same, reported as skipped so the
        // caller still gets a summary of what ran before the cancellation.
        if !halted {
            if let Some(id) = request_id {
                if state.cancellation.is_cancelled(id).await {
                    halted = true;
                }
            }
        }

        if halted {
            outcomes.push(QueueOpOutcome::Skipped);
            continue;
        }

        let op_name = arg_str(op, "op").unwrap_or("");
        let entity = arg_str(op, "entity").unwrap_or("");
        let body = body_without(op, &["op", "entity"]);

        let result: Result<Value, DispatchError> = match op_name {
            "create" => state.backend.graph_create(entity, &body).await.map_err(Into::into),
            "edit" => {
                let id = arg_str(op, "id").unwrap_or_default();
                state.backend.graph_edit(entity, id, &body).await.map_err(Into::into)
            }
            "delete" => {
                let id = arg_str(op, "id").unwrap_or_default();
                state.backend.graph_delete(entity, id).await.map_err(Into::into)
            }
            other => Err(DispatchError::Validation(format!("unknown queue op: {other}"))),
        };

        match result {
            Ok(payload) => outcomes.push(QueueOpOutcome::Success(
                payload.get("id").and_then(Value::as_str).unwrap_or("ok").to_string(),
            )),
            Err(err) => {
                outcomes.push(QueueOpOutcome::Failed(err.to_string()));
                if !continue_on_error {
                    halted = true;
                }
            }
        }
    }

    Ok(text(format_queue_summary(&outcomes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_false_is_not_treated_as_absent() {
        let args = json!({"include_grounding": false});
        assert_eq!(arg_bool(&args, "include_grounding", true), false);
        let absent = json!({});
        assert_eq!(arg_bool(&absent, "include_grounding", true), true);
        let explicit_null = json!({"include_grounding": null});
        assert_eq!(arg_bool(&explicit_null, "include_grounding", true), true);
    }

    #[test]
    fn explicit_zero_limit_is_honored() {
        let args = json!({"limit": 0});
        assert_eq!(arg_u32(&args, "limit", 10), 0);
    }

    #[test]
    fn body_without_strips_only_named_keys() {
        let args = json!({"action": "create", "entity": "edge", "label": "x"});
        let body = body_without(&args, &["action", "entity"]);
        assert_eq!(body, json!({"label": "x"}));
    }
}
