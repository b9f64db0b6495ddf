//! Optional remote collaborators — detailed-analysis narrative and product
//! recommendations.
//!
//! Both calls are best-effort: the locally computed report is complete
//! without them, and a failure surfaces as a non-fatal "unavailable" state.
//! Callers pass a `CancelToken`; cancellation aborts the in-flight request
//! with a terminal `Cancelled` error and never touches any already-computed
//! report. No automatic retry.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{HealthProfile, ProductRecord};

// ═══════════════════════════════════════════
// Cancellation
// ═══════════════════════════════════════════

/// Cooperative cancellation token. Cloneable; cancelling any clone cancels
/// them all.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}

/// How often an in-flight request checks its token.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ═══════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Service unreachable or timed out — informational, never blocks the
    /// local report.
    #[error("Remote insight service unavailable: {0}")]
    Unavailable(String),

    #[error("Remote insight service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unexpected response from remote insight service: {0}")]
    InvalidResponse(String),

    /// The caller cancelled the request. Terminal; no retry.
    #[error("Request cancelled")]
    Cancelled,
}

// ═══════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    profile: &'a HealthProfile,
    label: &'a ProductRecord,
}

#[derive(Deserialize)]
struct AnalysisResponse {
    ok: bool,
    #[serde(default)]
    detailed_analysis_markdown: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct RecommendRequest<'a> {
    profile: &'a HealthProfile,
    label: &'a ProductRecord,
    k: usize,
}

#[derive(Deserialize)]
struct RecommendResponse {
    ok: bool,
    #[serde(default)]
    items: Vec<RecommendedProduct>,
    #[serde(default)]
    error: Option<String>,
}

/// One ranked alternative from the recommender. Allergen-conflicting items
/// are already filtered server-side; ranking order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub health_score: f64,
    #[serde(default)]
    pub health_level: Option<String>,
    #[serde(default)]
    pub reasons: Vec<String>,
}

// ═══════════════════════════════════════════
// Client
// ═══════════════════════════════════════════

/// Source of remote narratives — seam for tests and alternate backends.
pub trait NarrativeSource {
    fn narrative(
        &self,
        profile: &HealthProfile,
        product: &ProductRecord,
        token: &CancelToken,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;
}

/// HTTP client for the remote insight backend.
pub struct RemoteInsightClient {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteInsightClient {
    /// Create a client for the given backend. Connect failures are cheap to
    /// detect; slow generation gets a generous overall timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the detailed-analysis narrative for a (profile, product) pair.
    pub async fn detailed_analysis(
        &self,
        profile: &HealthProfile,
        product: &ProductRecord,
        token: &CancelToken,
    ) -> Result<String, RemoteError> {
        let url = format!("{}/detailed-analysis", self.base_url);
        let body = AnalysisRequest {
            profile,
            label: product,
        };

        let response: AnalysisResponse = self
            .post_cancellable(&url, &body, token)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        if !response.ok {
            return Err(RemoteError::Unavailable(
                response.error.unwrap_or_else(|| "analysis failed".into()),
            ));
        }
        response
            .detailed_analysis_markdown
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| RemoteError::InvalidResponse("empty narrative".into()))
    }

    /// Fetch up to `k` ranked alternative products.
    pub async fn recommend(
        &self,
        profile: &HealthProfile,
        product: &ProductRecord,
        k: usize,
        token: &CancelToken,
    ) -> Result<Vec<RecommendedProduct>, RemoteError> {
        let url = format!("{}/recommend", self.base_url);
        let body = RecommendRequest {
            profile,
            label: product,
            k,
        };

        let response: RecommendResponse = self
            .post_cancellable(&url, &body, token)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        if !response.ok {
            return Err(RemoteError::Unavailable(
                response.error.unwrap_or_else(|| "recommend failed".into()),
            ));
        }
        Ok(response.items)
    }

    /// POST a JSON body, polling the cancel token while the request is in
    /// flight. A cancelled request drops the connection and returns
    /// `Cancelled` without retrying.
    async fn post_cancellable<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        token: &CancelToken,
    ) -> Result<reqwest::Response, RemoteError> {
        if token.is_cancelled() {
            return Err(RemoteError::Cancelled);
        }

        let request = self.client.post(url).json(body).send();
        tokio::pin!(request);

        loop {
            tokio::select! {
                result = &mut request => {
                    let response = result.map_err(|e| {
                        if e.is_connect() || e.is_timeout() {
                            RemoteError::Unavailable(e.to_string())
                        } else {
                            RemoteError::InvalidResponse(e.to_string())
                        }
                    })?;

                    let status = response.status();
                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(RemoteError::Http {
                            status: status.as_u16(),
                            body,
                        });
                    }
                    return Ok(response);
                }
                _ = tokio::time::sleep(CANCEL_POLL_INTERVAL) => {
                    if token.is_cancelled() {
                        tracing::debug!(url, "remote call cancelled");
                        return Err(RemoteError::Cancelled);
                    }
                }
            }
        }
    }
}

impl NarrativeSource for RemoteInsightClient {
    fn narrative(
        &self,
        profile: &HealthProfile,
        product: &ProductRecord,
        token: &CancelToken,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send {
        self.detailed_analysis(profile, product, token)
    }
}
