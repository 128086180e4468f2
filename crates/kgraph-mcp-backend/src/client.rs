//! C2 — the opaque HTTP client to the remote knowledge-graph API.
//!
//! One async method per backend endpoint family (§6.2). The client holds the
//! current bearer token behind a `tokio::sync::RwLock`; [`BackendClient::set_bearer_token`]
//! is the injection point the OAuth token manager (C5, in `kgraph-mcp-auth`)
//! writes into, and every outbound call reads it fresh. A reader never
//! observes a torn (token, expiry) pair because the whole `Option<String>` is
//! swapped under a single lock acquisition.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, trace};
use url::Url;

use crate::error::{BackendError, BackendResult};
use crate::types::*;

/// Flattens a JSON object into string query pairs. `serde_urlencoded` (what
/// `reqwest::RequestBuilder::query` uses under the hood) only accepts
/// map-like top-level values, and every caller here already has an object;
/// this just avoids re-deriving `Serialize` bounds at every call site.
fn query_pairs(value: &Value) -> Vec<(String, String)> {
    match value.as_object() {
        Some(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let s = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), s)
            })
            .collect(),
        None => Vec::new(),
    }
}

#[derive(Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl BackendClient {
    pub fn new(base_url: impl AsRef<str>) -> BackendResult<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base_url.as_ref())?,
            token: RwLock::new(None),
        })
    }

    /// Written only by C5 (the OAuth token manager). Replaces the previous
    /// token atomically; readers never see a partially-updated value.
    pub async fn set_bearer_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn current_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    fn url(&self, path: &str) -> BackendResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        query: Option<&Value>,
        body: Option<&Value>,
    ) -> BackendResult<Value> {
        let url = self.url(path)?;
        let mut req = self.http.request(method.clone(), url);
        if let Some(q) = query {
            req = req.query(&query_pairs(q));
        }
        if let Some(b) = body {
            req = req.json(b);
        }
        if let Some(token) = self.current_token().await {
            req = req.bearer_auth(token);
        }
        trace!(%method, %path, "dispatching backend call");
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            let value = resp.json::<Value>().await.unwrap_or(Value::Null);
            Ok(value)
        } else {
            let body = resp
                .json::<Value>()
                .await
                .unwrap_or_else(|_| serde_json::json!({"error": status.canonical_reason()}));
            debug!(%status, %path, "backend call returned error status");
            Err(BackendError::Status { status, body })
        }
    }

    async fn get_typed(&self, path: &str, params: &impl Serialize) -> BackendResult<Value> {
        let query = serde_json::to_value(params)?;
        self.call(Method::GET, path, Some(&query), None).await
    }

    async fn get(&self, path: &str, query: &Value) -> BackendResult<Value> {
        self.call(Method::GET, path, Some(query), None).await
    }

    async fn post(&self, path: &str, body: &Value) -> BackendResult<Value> {
        self.call(Method::POST, path, None, Some(body)).await
    }

    async fn delete(&self, path: &str) -> BackendResult<Value> {
        self.call(Method::DELETE, path, None, None).await
    }

    // ---- Auth -----------------------------------------------------------

    pub async fn get_oauth_token(
        &self,
        req: OAuthTokenRequest,
    ) -> BackendResult<OAuthTokenResponse> {
        let value = self.post("/oauth/token", &serde_json::to_value(&req)?).await?;
        Ok(serde_json::from_value(value)?)
    }

    // ---- Search -----------------------------------------------------------

    pub async fn search_concepts(&self, params: &SearchParams) -> BackendResult<Value> {
        self.get_typed("/search/concepts", params).await
    }

    pub async fn search_sources(&self, params: &SearchParams) -> BackendResult<Value> {
        self.get_typed("/search/sources", params).await
    }

    pub async fn search_documents(&self, params: &SearchParams) -> BackendResult<Value> {
        self.get_typed("/search/documents", params).await
    }

    // ---- Concepts -----------------------------------------------------------

    pub async fn get_concept_details(&self, params: &ConceptDetailsParams) -> BackendResult<Value> {
        self.get_typed(&format!("/concepts/{}", params.concept_id), params)
            .await
    }

    pub async fn find_related_concepts(&self, params: &RelatedConceptsParams) -> BackendResult<Value> {
        self.get_typed(&format!("/concepts/{}/related", params.concept_id), params)
            .await
    }

    pub async fn find_connection(&self, params: &ConnectExactParams) -> BackendResult<Value> {
        self.get_typed("/concepts/connect", params).await
    }

    pub async fn find_connection_by_search(
        &self,
        params: &ConnectSemanticParams,
    ) -> BackendResult<Value> {
        self.get_typed("/concepts/connect/search", params).await
    }

    // ---- Ontology -----------------------------------------------------------

    pub async fn ontology_list(&self) -> BackendResult<Value> {
        self.get("/ontologies", &Value::Null).await
    }

    pub async fn ontology_info(&self, name: &str) -> BackendResult<Value> {
        self.get(&format!("/ontologies/{name}"), &Value::Null).await
    }

    pub async fn ontology_files(&self, name: &str) -> BackendResult<Value> {
        self.get(&format!("/ontologies/{name}/files"), &Value::Null).await
    }

    pub async fn ontology_create(&self, body: &Value) -> BackendResult<Value> {
        self.post("/ontologies", body).await
    }

    pub async fn ontology_rename(&self, name: &str, body: &Value) -> BackendResult<Value> {
        self.post(&format!("/ontologies/{name}/rename"), body).await
    }

    pub async fn ontology_delete(&self, name: &str) -> BackendResult<Value> {
        self.delete(&format!("/ontologies/{name}")).await
    }

    pub async fn ontology_lifecycle(&self, name: &str, body: &Value) -> BackendResult<Value> {
        self.post(&format!("/ontologies/{name}/lifecycle"), body).await
    }

    pub async fn ontology_scores(&self, name: &str) -> BackendResult<Value> {
        self.get(&format!("/ontologies/{name}/scores"), &Value::Null).await
    }

    pub async fn ontology_score(&self, name: &str, body: &Value) -> BackendResult<Value> {
        self.post(&format!("/ontologies/{name}/score"), body).await
    }

    pub async fn ontology_score_all(&self) -> BackendResult<Value> {
        self.post("/ontologies/score-all", &Value::Null).await
    }

    pub async fn ontology_candidates(&self, name: &str) -> BackendResult<Value> {
        self.get(&format!("/ontologies/{name}/candidates"), &Value::Null).await
    }

    pub async fn ontology_affinity(&self, name: &str, body: &Value) -> BackendResult<Value> {
        self.post(&format!("/ontologies/{name}/affinity"), body).await
    }

    pub async fn ontology_edges(&self, name: &str) -> BackendResult<Value> {
        self.get(&format!("/ontologies/{name}/edges"), &Value::Null).await
    }

    pub async fn ontology_reassign(&self, body: &Value) -> BackendResult<Value> {
        self.post("/ontologies/reassign", body).await
    }

    pub async fn ontology_dissolve(&self, name: &str) -> BackendResult<Value> {
        self.post(&format!("/ontologies/{name}/dissolve"), &Value::Null)
            .await
    }

    pub async fn ontology_proposals(&self, name: &str) -> BackendResult<Value> {
        self.get(&format!("/ontologies/{name}/proposals"), &Value::Null).await
    }

    pub async fn ontology_review_proposal(&self, proposal_id: &str, body: &Value) -> BackendResult<Value> {
        self.post(&format!("/ontologies/proposals/{proposal_id}/review"), body)
            .await
    }

    pub async fn ontology_trigger_annealing_cycle(&self, body: &Value) -> BackendResult<Value> {
        self.post("/ontologies/annealing-cycle", body).await
    }

    // ---- Jobs -----------------------------------------------------------

    pub async fn get_job_status(&self, job_id: &str) -> BackendResult<Value> {
        self.get(&format!("/jobs/{job_id}"), &Value::Null).await
    }

    pub async fn list_jobs(&self, params: &Value) -> BackendResult<Value> {
        self.get("/jobs", params).await
    }

    pub async fn approve_job(&self, job_id: &str) -> BackendResult<Value> {
        self.post(&format!("/jobs/{job_id}/approve"), &Value::Null)
            .await
    }

    pub async fn cancel_job(&self, job_id: &str) -> BackendResult<Value> {
        self.post(&format!("/jobs/{job_id}/cancel"), &Value::Null)
            .await
    }

    pub async fn delete_job(&self, job_id: &str) -> BackendResult<Value> {
        self.delete(&format!("/jobs/{job_id}")).await
    }

    pub async fn delete_jobs(&self, body: &Value) -> BackendResult<Value> {
        self.call(Method::DELETE, "/jobs", None, Some(body))
            .await
    }

    // ---- Ingest -----------------------------------------------------------

    pub async fn ingest_text(&self, params: &IngestTextParams) -> BackendResult<Value> {
        self.post("/ingest/text", &serde_json::to_value(params)?).await
    }

    pub async fn ingest_file(&self, params: &IngestFileParams) -> BackendResult<Value> {
        self.post("/ingest/file", &serde_json::to_value(params)?).await
    }

    // ---- Source -----------------------------------------------------------

    pub async fn get_source_metadata(&self, source_id: &str) -> BackendResult<Value> {
        self.get(&format!("/sources/{source_id}"), &Value::Null).await
    }

    pub async fn get_source_image_base64(&self, source_id: &str) -> BackendResult<Value> {
        self.get(&format!("/sources/{source_id}/image"), &Value::Null).await
    }

    // ---- Epistemic -----------------------------------------------------------

    pub async fn epistemic_list(&self) -> BackendResult<Value> {
        self.get("/epistemic-status", &Value::Null).await
    }

    pub async fn epistemic_show(&self, id: &str) -> BackendResult<Value> {
        self.get(&format!("/epistemic-status/{id}"), &Value::Null).await
    }

    pub async fn epistemic_measure(&self, body: &Value) -> BackendResult<Value> {
        self.post("/epistemic-status/measure", body).await
    }

    // ---- Polarity -----------------------------------------------------------

    pub async fn analyze_polarity_axis(&self, body: &Value) -> BackendResult<Value> {
        self.post("/polarity/analyze", body).await
    }

    // ---- Artifacts -----------------------------------------------------------

    pub async fn artifact_list(&self) -> BackendResult<Value> {
        self.get("/artifacts", &Value::Null).await
    }

    pub async fn artifact_show(&self, id: &str) -> BackendResult<Value> {
        self.get(&format!("/artifacts/{id}"), &Value::Null).await
    }

    pub async fn artifact_payload(&self, id: &str) -> BackendResult<Value> {
        self.get(&format!("/artifacts/{id}/payload"), &Value::Null).await
    }

    // ---- Documents -----------------------------------------------------------

    pub async fn document_list(&self) -> BackendResult<Value> {
        self.get("/documents", &Value::Null).await
    }

    pub async fn document_show(&self, id: &str) -> BackendResult<Value> {
        self.get(&format!("/documents/{id}"), &Value::Null).await
    }

    pub async fn document_concepts(&self, id: &str) -> BackendResult<Value> {
        self.get(&format!("/documents/{id}/concepts"), &Value::Null).await
    }

    // ---- Graph CRUD -----------------------------------------------------------

    pub async fn graph_create(&self, entity: &str, body: &Value) -> BackendResult<Value> {
        self.post(&format!("/graph/{entity}"), body).await
    }

    pub async fn graph_edit(&self, entity: &str, id: &str, body: &Value) -> BackendResult<Value> {
        self.call(
            Method::PATCH,
            &format!("/graph/{entity}/{id}"),
            None,
            Some(body),
        )
        .await
    }

    pub async fn graph_delete(&self, entity: &str, id: &str) -> BackendResult<Value> {
        self.delete(&format!("/graph/{entity}/{id}")).await
    }

    pub async fn graph_list(&self, entity: &str, params: &Value) -> BackendResult<Value> {
        self.get(&format!("/graph/{entity}"), params).await
    }

    // ---- Database / system info -----------------------------------------------------------

    pub async fn database_stats(&self) -> BackendResult<Value> {
        self.get("/database/stats", &Value::Null).await
    }

    pub async fn database_info(&self) -> BackendResult<Value> {
        self.get("/database/info", &Value::Null).await
    }

    pub async fn database_health(&self) -> BackendResult<Value> {
        self.get("/database/health", &Value::Null).await
    }

    pub async fn system_status(&self) -> BackendResult<Value> {
        self.get("/system/status", &Value::Null).await
    }

    pub async fn api_health(&self) -> BackendResult<Value> {
        self.get("/health", &Value::Null).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bearer_token_round_trips() {
        let client = BackendClient::new("http://127.0.0.1:1/").unwrap();
        assert_eq!(client.current_token().await, None);
        client.set_bearer_token(Some("abc".to_string())).await;
        assert_eq!(client.current_token().await, Some("abc".to_string()));
        client.set_bearer_token(None).await;
        assert_eq!(client.current_token().await, None);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(BackendClient::new("not a url").is_err());
    }
}
