//! Search gateway: the boundary between the tool and the generative backend.
//!
//! The default client is built once at startup and shared read-only across
//! concurrent calls. A call naming a different model gets a short-lived client
//! that is dropped when the call returns.

use std::{future::Future, pin::Pin, sync::Arc};

use async_trait::async_trait;

use crate::clients::gemini::GeminiClient;
use crate::domain::{SearchError, SearchOptions, SearchResult};

pub const DEFAULT_LANGUAGE: &str = "en-US";

#[async_trait]
pub trait SearchGateway: Send + Sync + 'static {
    async fn invoke(&self, opts: &SearchOptions) -> Result<SearchResult, SearchError>;
}

pub struct GeminiGateway {
    default: Arc<GeminiClient>,
}

impl GeminiGateway {
    pub fn new(default: Arc<GeminiClient>) -> Self {
        Self { default }
    }
}

/// Borrowed shared client or an ephemeral per-call one.
enum Backend<'a> {
    Shared(&'a GeminiClient),
    Ephemeral(GeminiClient),
}

impl Backend<'_> {
    fn client(&self) -> &GeminiClient {
        match self {
            Backend::Shared(c) => *c,
            Backend::Ephemeral(c) => c,
        }
    }
}

impl GeminiGateway {
    fn backend_for(&self, model: Option<&str>) -> Backend<'_> {
        match model {
            Some(m) if m != self.default.model() => {
                tracing::debug!(model = m, "using per-call model override");
                Backend::Ephemeral(self.default.for_model(m))
            }
            _ => Backend::Shared(&self.default),
        }
    }
}

#[async_trait]
impl SearchGateway for GeminiGateway {
    async fn invoke(&self, opts: &SearchOptions) -> Result<SearchResult, SearchError> {
        let backend = self.backend_for(opts.model.as_deref());
        backend.client().generate(&build_prompt(opts)).await
    }
}

/// The query, plus a reply-language hint for non-default locales.
pub fn build_prompt(opts: &SearchOptions) -> String {
    match opts.language.as_deref() {
        Some(lang) if !lang.eq_ignore_ascii_case(DEFAULT_LANGUAGE) => {
            format!("{}\n\nRespond in the language of locale {}.", opts.query, lang)
        }
        _ => opts.query.clone(),
    }
}

type GatewayFuture = Pin<Box<dyn Future<Output = Result<SearchResult, SearchError>> + Send>>;

/// Gateway backed by a closure, for wiring stand-in backends.
pub struct FnGateway {
    inner: Arc<dyn Fn(SearchOptions) -> GatewayFuture + Send + Sync>,
}

impl FnGateway {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(SearchOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<SearchResult, SearchError>> + Send + 'static,
    {
        Self { inner: Arc::new(move |o| Box::pin(f(o))) }
    }
}

#[async_trait]
impl SearchGateway for FnGateway {
    async fn invoke(&self, opts: &SearchOptions) -> Result<SearchResult, SearchError> {
        (self.inner)(opts.clone()).await
    }
}
