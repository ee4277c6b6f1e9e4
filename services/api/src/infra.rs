use hr_console::workflows::interviews::{
    replace_if_current, InterviewId, InterviewRecord, InterviewRepository, NotificationError,
    NotificationPublisher, RepositoryError, ReviewNotice,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryInterviewRepository {
    records: Arc<Mutex<HashMap<InterviewId, InterviewRecord>>>,
}

impl InMemoryInterviewRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<InterviewId, InterviewRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl InterviewRepository for InMemoryInterviewRepository {
    fn insert(&self, record: InterviewRecord) -> Result<InterviewRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: InterviewRecord) -> Result<InterviewRecord, RepositoryError> {
        let mut guard = self.lock()?;
        replace_if_current(guard.get_mut(&record.id), record)
    }

    fn fetch(&self, id: &InterviewId) -> Result<Option<InterviewRecord>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<InterviewRecord>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}

/// Logs every notice in place of the mail relay. The recording variant also keeps them so
/// the demo can print what was sent.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier {
    recorded: Option<Arc<Mutex<Vec<ReviewNotice>>>>,
}

impl LoggingNotifier {
    pub(crate) fn recording() -> Self {
        Self {
            recorded: Some(Arc::default()),
        }
    }

    pub(crate) fn notices(&self) -> Vec<ReviewNotice> {
        self.recorded
            .as_ref()
            .and_then(|notices| notices.lock().ok().map(|guard| guard.clone()))
            .unwrap_or_default()
    }
}

impl NotificationPublisher for LoggingNotifier {
    fn publish(&self, notice: ReviewNotice) -> Result<(), NotificationError> {
        info!(
            template = %notice.template,
            interview = %notice.interview_id,
            "review notification queued"
        );
        if let Some(notices) = &self.recorded {
            notices
                .lock()
                .map_err(|_| NotificationError::Transport("notifier mutex poisoned".to_string()))?
                .push(notice);
        }
        Ok(())
    }
}
