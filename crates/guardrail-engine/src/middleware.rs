//! Guarded-handler middleware
//!
//! Wraps an async handler so the policy evaluation runs first. A denial
//! short-circuits into a structured rejection payload instead of
//! invoking the handler. An internal engine error fails OPEN: the
//! handler runs and a warning is logged. That is a deliberate
//! availability-over-enforcement tradeoff — a broken policy backend
//! must not take down every gated call path with it.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use guardrail_common::CheckContext;

use crate::engine::PolicyEngine;

type Extractor<R, T> = Box<dyn Fn(&R) -> Option<T> + Send + Sync>;

/// Static gate configuration bound to one call site: the tenant, the
/// operation name, and extractors that pull cost, content, and caller
/// identity out of the request type.
pub struct PolicyGate<R> {
    engine: Arc<PolicyEngine>,
    tenant: String,
    operation: String,
    cost_fn: Option<Extractor<R, f64>>,
    content_fn: Option<Extractor<R, String>>,
    identity_fn: Option<Extractor<R, String>>,
}

/// Structured rejection returned instead of invoking the handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateRejection {
    /// Always false; present so the payload is self-describing when
    /// serialized straight into an error response
    pub ok: bool,
    /// Violation descriptions from the failed checks
    pub violations: Vec<String>,
    /// Remediation suggestions gathered from the failed checks
    pub recommendations: Vec<String>,
}

/// Outcome of a gated call
#[derive(Debug)]
pub enum GateOutcome<T> {
    /// The handler ran and returned this value
    Proceeded(T),
    /// The gate denied the operation; the handler never ran
    Rejected(GateRejection),
}

impl<T> GateOutcome<T> {
    /// True when the gate denied the operation
    pub fn is_rejected(&self) -> bool {
        matches!(self, GateOutcome::Rejected(_))
    }

    /// Convert into a `Result`, treating rejection as the error
    pub fn into_result(self) -> Result<T, GateRejection> {
        match self {
            GateOutcome::Proceeded(value) => Ok(value),
            GateOutcome::Rejected(rejection) => Err(rejection),
        }
    }
}

impl<R> PolicyGate<R> {
    /// Create a gate for one (tenant, operation) call site
    pub fn new(
        engine: Arc<PolicyEngine>,
        tenant: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            tenant: tenant.into(),
            operation: operation.into(),
            cost_fn: None,
            content_fn: None,
            identity_fn: None,
        }
    }

    /// Estimate the operation's cost from the request
    pub fn with_cost_estimator(
        mut self,
        f: impl Fn(&R) -> Option<f64> + Send + Sync + 'static,
    ) -> Self {
        self.cost_fn = Some(Box::new(f));
        self
    }

    /// Extract scannable content from the request
    pub fn with_content_extractor(
        mut self,
        f: impl Fn(&R) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.content_fn = Some(Box::new(f));
        self
    }

    /// Extract the caller identity from the request
    pub fn with_identity_extractor(
        mut self,
        f: impl Fn(&R) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.identity_fn = Some(Box::new(f));
        self
    }

    /// Run the gate, then the handler.
    ///
    /// Denial returns [`GateOutcome::Rejected`] without invoking the
    /// handler. An engine error (e.g. the tenant's configuration store
    /// is unreachable) fails open: the handler runs and the error is
    /// logged.
    pub async fn run<T, F, Fut>(&self, request: R, handler: F) -> GateOutcome<T>
    where
        F: FnOnce(R) -> Fut,
        Fut: Future<Output = T>,
    {
        let mut ctx = CheckContext::new(Uuid::new_v4().to_string(), self.operation.clone());
        ctx.estimated_cost = self.cost_fn.as_ref().and_then(|f| f(&request));
        ctx.content = self.content_fn.as_ref().and_then(|f| f(&request));
        ctx.caller_identity = self.identity_fn.as_ref().and_then(|f| f(&request));

        match self.engine.evaluate(&self.tenant, ctx).await {
            Ok(decision) if !decision.allowed => {
                let violations = decision
                    .results
                    .iter()
                    .filter(|r| !r.passed)
                    .flat_map(|r| r.violations.iter().cloned())
                    .collect();
                GateOutcome::Rejected(GateRejection {
                    ok: false,
                    violations,
                    recommendations: decision.recommendations(),
                })
            }
            Ok(_) => GateOutcome::Proceeded(handler(request).await),
            Err(e) => {
                // Fail open on internal errors; see the module docs.
                warn!(
                    tenant = %self.tenant,
                    operation = %self.operation,
                    error = %e,
                    "policy evaluation failed, proceeding without enforcement"
                );
                GateOutcome::Proceeded(handler(request).await)
            }
        }
    }
}
