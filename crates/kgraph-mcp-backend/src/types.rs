//! Typed request shapes for the knowledge-graph backend endpoint families (§6.2).
//!
//! Response bodies are intentionally left as [`serde_json::Value`]: the backend
//! is out of scope for this workspace (§1) and its payload shapes are the
//! concern of the response formatters in `kgraph-mcp-server`, not this client.
//! Keeping request parameters typed here still lets the dispatcher build a
//! call without hand-assembling JSON at every call site.

use serde::Serialize;

/// `client_credentials` token request (§6.2 Auth).
#[derive(Debug, Clone, Serialize)]
pub struct OAuthTokenRequest {
    pub grant_type: &'static str,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
}

impl OAuthTokenRequest {
    pub fn client_credentials(client_id: String, client_secret: String) -> Self {
        Self {
            grant_type: "client_credentials",
            client_id,
            client_secret,
            scope: "read:* write:*".to_string(),
        }
    }
}

/// `{access_token, expires_in}` response from the backend's auth endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct SearchParams {
    pub query: String,
    pub limit: u32,
    pub min_similarity: Option<f64>,
    pub offset: u32,
    pub include_grounding: Option<bool>,
    pub include_evidence: Option<bool>,
    pub include_diversity: Option<bool>,
    pub diversity_max_hops: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConceptDetailsParams {
    pub concept_id: String,
    pub include_grounding: bool,
    pub include_diversity: bool,
    pub diversity_max_hops: u32,
    pub truncate_evidence: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelatedConceptsParams {
    pub concept_id: String,
    pub max_depth: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectExactParams {
    pub from_id: String,
    pub to_id: String,
    pub max_hops: u32,
    pub include_grounding: bool,
    pub include_evidence: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectSemanticParams {
    pub from_query: String,
    pub to_query: String,
    pub max_hops: u32,
    pub threshold: f64,
    pub include_grounding: bool,
    pub include_evidence: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestTextParams {
    pub ontology: String,
    pub text: String,
    pub auto_approve: bool,
    pub force: bool,
    pub processing_mode: String,
    pub target_words: u32,
    pub overlap_words: u32,
    pub source_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestFileParams {
    pub ontology: String,
    pub path: String,
    pub auto_approve: bool,
    pub force: bool,
}

