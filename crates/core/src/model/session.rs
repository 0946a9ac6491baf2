use chrono::{DateTime, Duration, Utc};

use crate::model::{Category, SessionId};

/// Client-side view of one quiz attempt.
///
/// The id and category are fixed at construction. The score can only grow, and only
/// through `record_correct`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    category: Option<Category>,
    score: u32,
    index: Option<u32>,
    total: Option<u32>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Session {
    #[must_use]
    pub fn new(id: SessionId, category: Option<Category>, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            category,
            score: 0,
            index: None,
            total: None,
            started_at,
            finished_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ordinal of the active question as reported by the API.
    #[must_use]
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    #[must_use]
    pub fn total(&self) -> Option<u32> {
        self.total
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Time between start and finish, or `None` while the quiz is running.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.finished_at.map(|at| at - self.started_at)
    }

    pub fn set_progress(&mut self, index: u32, total: u32) {
        self.index = Some(index);
        self.total = Some(total);
    }

    pub fn record_correct(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    /// Stamp the finish time. Later calls keep the first stamp.
    pub fn finish(&mut self, at: DateTime<Utc>) {
        if self.finished_at.is_none() {
            self.finished_at = Some(at.max(self.started_at));
        }
    }
}
