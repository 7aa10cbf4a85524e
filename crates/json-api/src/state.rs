//! State

use std::sync::Arc;

use pasal_app::{
    context::AppContext,
    domain::reconciliation::models::CallbackOutcome,
    gateway::CallbackUrls,
};

/// Storefront pages shoppers are redirected to after a gateway callback.
#[derive(Debug, Clone)]
pub(crate) struct RedirectPages {
    pub(crate) success: String,
    pub(crate) failure: String,
}

impl RedirectPages {
    pub(crate) fn from_urls(urls: &CallbackUrls) -> Self {
        Self {
            success: urls.success_page_url.clone(),
            failure: urls.failure_page_url.clone(),
        }
    }

    /// Redirect target for a reconciliation outcome.
    pub(crate) fn redirect_target(&self, outcome: &CallbackOutcome) -> String {
        match outcome {
            CallbackOutcome::Success {
                order_id,
                transaction_code,
            } => format!(
                "{}?order_id={order_id}&transaction_code={transaction_code}",
                self.success
            ),
            CallbackOutcome::Failure {
                reason: Some(reason),
            } => format!("{}?reason={}", self.failure, reason.as_str()),
            CallbackOutcome::Failure { reason: None } => self.failure.clone(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) pages: RedirectPages,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, pages: RedirectPages) -> Self {
        Self { app, pages }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, pages: RedirectPages) -> Arc<Self> {
        Arc::new(Self::new(app, pages))
    }
}
