//! Registry of open checkout sessions.
//!
//! Sessions leave the registry when the customer navigates away from a
//! finished checkout, on explicit removal, or when the sweeper finds them
//! older than the configured time-to-live.

use crate::session::CheckoutSession;
use chrono::{DateTime, Utc};
use momo_core::{CheckoutError, CheckoutResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

/// Open sessions by id
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<CheckoutSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: CheckoutSession) -> Arc<CheckoutSession> {
        let session = Arc::new(session);
        self.sessions
            .write()
            .await
            .insert(session.id(), session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> CheckoutResult<Arc<CheckoutSession>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CheckoutError::SessionNotFound {
                session_id: id.to_string(),
            })
    }

    /// Remove a session and cancel any processing it still runs
    pub async fn remove(&self, id: Uuid) -> CheckoutResult<()> {
        let session = self.sessions.write().await.remove(&id).ok_or_else(|| {
            CheckoutError::SessionNotFound {
                session_id: id.to_string(),
            }
        })?;
        session.cancel().await;
        Ok(())
    }

    /// Drop every session opened before `cutoff`, cancelling its processing.
    /// Returns how many were evicted.
    pub async fn evict_created_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut expired = Vec::new();
        self.sessions.write().await.retain(|_, session| {
            if session.created_at() < cutoff {
                expired.push(session.clone());
                false
            } else {
                true
            }
        });

        for session in &expired {
            session.cancel().await;
        }
        expired.len()
    }

    /// Spawn a background task evicting sessions older than `ttl` every `every`
    pub fn spawn_sweeper(&self, every: Duration, ttl: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let ttl = match chrono::Duration::from_std(ttl) {
                Ok(ttl) => ttl,
                Err(e) => {
                    warn!("Session sweeper disabled, bad TTL: {}", e);
                    return;
                }
            };

            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let Some(cutoff) = Utc::now().checked_sub_signed(ttl) else {
                    continue;
                };
                let evicted = registry.evict_created_before(cutoff).await;
                if evicted > 0 {
                    info!(evicted, "Expired checkout sessions evicted");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
