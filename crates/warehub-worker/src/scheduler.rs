//! Cron scheduler that drains the alert queue periodically.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use warehub_core::error::AppError;
use warehub_service::{AlertDispatcher, BatchSummary, DispatchRequest};

/// Cron-based scheduler for the alert dispatch batch.
pub struct DispatchScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Dispatcher invoked on every tick
    dispatcher: Arc<AlertDispatcher>,
    /// Held while a batch runs so ticks never overlap
    running: Arc<Mutex<()>>,
}

impl std::fmt::Debug for DispatchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchScheduler").finish()
    }
}

impl DispatchScheduler {
    /// Create a new scheduler
    pub async fn new(dispatcher: Arc<AlertDispatcher>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            dispatcher,
            running: Arc::new(Mutex::new(())),
        })
    }

    /// Register the dispatch batch on the given cron expression
    pub async fn register(&self, schedule: &str) -> Result<(), AppError> {
        let dispatcher = Arc::clone(&self.dispatcher);
        let running = Arc::clone(&self.running);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let dispatcher = Arc::clone(&dispatcher);
            let running = Arc::clone(&running);
            Box::pin(async move {
                run_exclusive(&dispatcher, &running).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid dispatch schedule '{}': {}", schedule, e))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add dispatch schedule: {}", e)))?;

        tracing::info!("Registered: alert_dispatch ({})", schedule);
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Dispatch scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Dispatch scheduler shut down");
        Ok(())
    }
}

/// Run one batch unless another is still in progress.
///
/// Returns `None` when the tick was skipped or the queue could not be read.
pub async fn run_exclusive(
    dispatcher: &AlertDispatcher,
    running: &Mutex<()>,
) -> Option<BatchSummary> {
    let Ok(_guard) = running.try_lock() else {
        tracing::debug!("Previous dispatch batch still running, skipping tick");
        return None;
    };

    match dispatcher.run_batch(&DispatchRequest::default()).await {
        Ok(summary) => {
            if summary.processed > 0 {
                tracing::info!("Scheduled dispatch: {}", summary.message);
            }
            Some(summary)
        }
        Err(e) => {
            tracing::error!("Scheduled dispatch failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;
    use warehub_core::config::{DispatchConfig, MailConfig};
    use warehub_database::{InMemoryStore, Stores};
    use warehub_entity::alert::{Alert, AlertStatus};
    use warehub_mail::MemoryOutbox;

    use super::*;

    fn dispatcher(store: &InMemoryStore) -> AlertDispatcher {
        AlertDispatcher::new(
            Stores::in_memory(store.clone()),
            Arc::new(MemoryOutbox::new()),
            DispatchConfig::default(),
            &MailConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_run_exclusive_skips_when_batch_in_progress() {
        let store = InMemoryStore::new();
        let dispatcher = dispatcher(&store);
        let running = Mutex::new(());

        let guard = running.lock().await;
        assert!(run_exclusive(&dispatcher, &running).await.is_none());
        drop(guard);

        let summary = run_exclusive(&dispatcher, &running).await.unwrap();
        assert_eq!(summary.processed, 0);
    }

    #[tokio::test]
    async fn test_run_exclusive_processes_pending_alerts() {
        let store = InMemoryStore::new();
        let alert = Alert {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            alert_type: "shipment_received".to_string(),
            entity_type: None,
            entity_id: None,
            recipient_emails: Some(vec!["ops@acme.test".to_string()]),
            subject: None,
            body_html: None,
            body_text: None,
            status: AlertStatus::Pending,
            error_message: None,
            sent_at: None,
            created_at: Utc::now(),
        };
        store.insert_alert(alert.clone()).await;

        let summary = run_exclusive(&dispatcher(&store), &Mutex::new(()))
            .await
            .unwrap();
        assert_eq!(summary.sent, 1);
        assert_eq!(store.alert(alert.id).await.unwrap().status, AlertStatus::Sent);
    }

    #[tokio::test]
    async fn test_invalid_schedule_is_configuration_error() {
        let scheduler = DispatchScheduler::new(Arc::new(dispatcher(&InMemoryStore::new())))
            .await
            .unwrap();
        let err = scheduler.register("not a cron").await.unwrap_err();
        assert_eq!(err.kind, warehub_core::error::ErrorKind::Configuration);
    }
}
