//! Console audit sink for development. Writes events to tracing output.

use async_trait::async_trait;
use tracing::info;
use welfare_application::{AuditEvent, AuditRepository};
use welfare_core::AppResult;

/// Development audit repository that logs events instead of storing them.
#[derive(Clone)]
pub struct ConsoleAuditRepository;

impl ConsoleAuditRepository {
    /// Creates a new console audit repository.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleAuditRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditRepository for ConsoleAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            subject = event.subject.as_str(),
            action = event.action.as_str(),
            resource_type = event.resource_type.as_str(),
            resource_id = event.resource_id.as_str(),
            detail = event.detail.as_deref().unwrap_or_default(),
            "audit event"
        );

        Ok(())
    }
}
