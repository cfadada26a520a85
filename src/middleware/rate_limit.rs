use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Semaphore;
use tracing::{info, warn, debug};

use crate::error::AppError;
use crate::state::AppState;

/// Caps the number of in-flight requests and counts rejections.
pub struct RequestLimiter {
    semaphore: Semaphore,
    total_requests: AtomicU64,
    rejected_requests: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterMetrics {
    pub total_requests: u64,
    pub rejected_requests: u64,
    pub available_permits: usize,
}

impl RequestLimiter {
    pub fn new(max_requests: usize) -> Self {
        info!(
            max_concurrent_requests = max_requests,
            "Initializing request semaphore"
        );
        Self {
            semaphore: Semaphore::new(max_requests),
            total_requests: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
        }
    }

    pub fn metrics(&self) -> LimiterMetrics {
        LimiterMetrics {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            available_permits: self.semaphore.available_permits(),
        }
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    if path == "/" || path == "/health" || path == "/ready" {
        return Ok(next.run(request).await);
    }

    let limiter = &state.limiter;
    let total_requests = limiter.total_requests.fetch_add(1, Ordering::Relaxed) + 1;

    let _permit = limiter
        .semaphore
        .try_acquire()
        .map_err(|_| {
            let rejected = limiter.rejected_requests.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(
                path = path,
                total_requests = total_requests,
                rejected_requests = rejected,
                available_permits = limiter.semaphore.available_permits(),
                "Rate limit exceeded - too many concurrent requests"
            );
            AppError::RateLimitExceeded
        })?;

    debug!(
        path = path,
        total_requests = total_requests,
        available_permits = limiter.semaphore.available_permits(),
        "Request permit acquired"
    );

    let response = next.run(request).await;

    debug!(path = path, "Request completed, permit released");

    Ok(response)
}
