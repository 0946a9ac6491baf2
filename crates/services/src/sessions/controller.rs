use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use quiz_core::Clock;
use quiz_core::model::{AnswerAttempt, Category, Question, QuizResult, Session, SessionId};

use super::phase::{Ignored, Operation, QuizPhase, Resume, Step};
use super::snapshot::{Failure, QuizSnapshot};
use crate::api::{QuestionFetch, QuizApi};
use crate::error::ApiError;

/// Render hook: called with a fresh snapshot after every state change.
///
/// Runs while the controller's state lock is held, so snapshots arrive in order.
/// Implementations must not block.
pub trait SessionObserver: Send + Sync {
    fn on_change(&self, snapshot: &QuizSnapshot);
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Default)]
struct SessionState {
    phase: QuizPhase,
    /// Bumped on every restart/discard; responses carrying an older epoch are dropped.
    epoch: u64,
    requested: Option<Category>,
    session: Option<Session>,
    question: Option<Question>,
    answer: Option<AnswerAttempt>,
    result: Option<QuizResult>,
    failure: Option<Failure>,
    failed: Option<Operation>,
}

/// Identity of the session a request was sent for.
#[derive(Clone, Debug)]
struct Ticket {
    epoch: u64,
    session_id: SessionId,
}

impl SessionState {
    fn reset(&mut self) {
        let epoch = self.epoch.wrapping_add(1);
        *self = Self {
            epoch,
            ..Self::default()
        };
    }

    fn is_current(&self, epoch: u64, session_id: Option<&SessionId>) -> bool {
        self.epoch == epoch && self.session.as_ref().map(Session::id) == session_id
    }

    fn holds(&self, ticket: &Ticket) -> bool {
        self.is_current(ticket.epoch, Some(&ticket.session_id))
    }

    fn ticket(&self) -> Option<Ticket> {
        self.session.as_ref().map(|session| Ticket {
            epoch: self.epoch,
            session_id: session.id().clone(),
        })
    }

    fn clear_failure(&mut self) {
        self.failure = None;
        self.failed = None;
    }

    fn snapshot(&self) -> QuizSnapshot {
        let session = self.session.as_ref();
        QuizSnapshot {
            phase: self.phase,
            session_id: session.map(|s| s.id().clone()),
            category: session.map_or_else(|| self.requested.clone(), |s| s.category().cloned()),
            score: session.map_or(0, Session::score),
            index: session.and_then(Session::index),
            total: session.and_then(Session::total),
            question: self.question.clone(),
            answer: self.answer.clone(),
            result: self.result,
            started_at: session.map(Session::started_at),
            finished_at: session.and_then(Session::finished_at),
            failure: self.failure.clone(),
        }
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives one quiz attempt against a `QuizApi`.
///
/// At most one request is in flight at a time: calls made while another is pending
/// return `Step::Ignored(Ignored::Busy)` without touching the network. Failures move the
/// controller to `QuizPhase::Errored` and leave everything else as it was before the call.
pub struct QuizSessionController {
    api: Arc<dyn QuizApi>,
    clock: Clock,
    observer: Option<Arc<dyn SessionObserver>>,
    state: Mutex<SessionState>,
}

impl QuizSessionController {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self {
            api,
            clock: Clock::default_clock(),
            observer: None,
            state: Mutex::new(SessionState::default()),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub async fn snapshot(&self) -> QuizSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn phase(&self) -> QuizPhase {
        self.state.lock().await.phase
    }

    /// Start a fresh session, optionally limited to one category, and load its first question.
    ///
    /// Local state is reset before the request is sent, so a failed start leaves no session
    /// and a zero score. Allowed from any phase except `Loading`.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` that moved the controller to `QuizPhase::Errored`.
    pub async fn start(&self, category: Option<Category>) -> Result<Step, ApiError> {
        let epoch = {
            let mut state = self.state.lock().await;
            if state.phase == QuizPhase::Loading {
                return Ok(Step::Ignored(Ignored::Busy));
            }
            self.restart(&mut state, category.clone())
        };
        self.run_start(epoch, category).await
    }

    /// Refetch the current question. Valid while a question is shown or revealed.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` that moved the controller to `QuizPhase::Errored`.
    pub async fn load_question(&self) -> Result<Step, ApiError> {
        let ticket = {
            let mut state = self.state.lock().await;
            match self.begin(
                &mut state,
                &[QuizPhase::QuestionActive, QuizPhase::AnswerRevealed],
            ) {
                Ok(ticket) => ticket,
                Err(ignored) => return Ok(Step::Ignored(ignored)),
            }
        };
        self.run_load(ticket).await
    }

    /// Move on from a revealed answer to the next question, or to the result.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` that moved the controller to `QuizPhase::Errored`.
    pub async fn next(&self) -> Result<Step, ApiError> {
        let ticket = {
            let mut state = self.state.lock().await;
            match self.begin(&mut state, &[QuizPhase::AnswerRevealed]) {
                Ok(ticket) => ticket,
                Err(ignored) => return Ok(Step::Ignored(ignored)),
            }
        };
        self.run_load(ticket).await
    }

    /// Submit `choice` (an index into the active question's choices).
    ///
    /// Only the first valid submission per question is sent; duplicates and out-of-range
    /// indices are ignored.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` that moved the controller to `QuizPhase::Errored`. The question
    /// stays unanswered and the score unchanged.
    pub async fn submit_answer(&self, choice: usize) -> Result<Step, ApiError> {
        let ticket = {
            let mut state = self.state.lock().await;
            match state.phase {
                QuizPhase::Loading => return Ok(Step::Ignored(Ignored::Busy)),
                QuizPhase::AnswerRevealed => return Ok(Step::Ignored(Ignored::AlreadyAnswered)),
                _ => {}
            }
            if state.phase == QuizPhase::QuestionActive {
                if state.answer.is_some() {
                    return Ok(Step::Ignored(Ignored::AlreadyAnswered));
                }
                let choices = state.question.as_ref().map_or(0, Question::choice_count);
                if choice >= choices {
                    return Ok(Step::Ignored(Ignored::ChoiceOutOfRange { choice, choices }));
                }
            }
            match self.begin(&mut state, &[QuizPhase::QuestionActive]) {
                Ok(ticket) => ticket,
                Err(ignored) => return Ok(Step::Ignored(ignored)),
            }
        };
        self.run_answer(ticket, choice).await
    }

    /// Fetch the final score of a finished session.
    ///
    /// Safe to call repeatedly; it never changes the phase. Returns `None` without sending
    /// anything unless the controller is `Finished`, and `None` when the session was
    /// discarded or restarted while the request was in flight.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails. The controller stays `Finished` with the
    /// failure attached to its snapshot until a later fetch succeeds.
    pub async fn fetch_result(&self) -> Result<Option<QuizResult>, ApiError> {
        let ticket = {
            let state = self.state.lock().await;
            if state.phase != QuizPhase::Finished {
                return Ok(None);
            }
            let Some(ticket) = state.ticket() else {
                return Ok(None);
            };
            ticket
        };

        let fetched = self.api.result(&ticket.session_id).await;

        let mut state = self.state.lock().await;
        if !state.holds(&ticket) || state.phase != QuizPhase::Finished {
            log::debug!("dropping result for abandoned session {}", ticket.session_id);
            return Ok(None);
        }
        match fetched {
            Ok(result) => {
                if state.result != Some(result) || state.failure.is_some() {
                    state.result = Some(result);
                    state.failure = None;
                    self.publish(&state);
                }
                Ok(Some(result))
            }
            Err(err) => {
                log::warn!("result refetch failed: {err}");
                state.failure = Some(Failure::from(&err));
                self.publish(&state);
                Err(err)
            }
        }
    }

    /// Re-run the operation that failed. Only valid in `Errored`.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` if the operation fails again.
    pub async fn retry(&self) -> Result<Step, ApiError> {
        let mut state = self.state.lock().await;
        match state.phase {
            QuizPhase::Errored => {}
            QuizPhase::Loading => return Ok(Step::Ignored(Ignored::Busy)),
            phase => return Ok(Step::Ignored(Ignored::WrongPhase(phase))),
        }
        let Some(operation) = state.failed.clone() else {
            return Ok(Step::Ignored(Ignored::WrongPhase(QuizPhase::Errored)));
        };

        let resume = match operation {
            Operation::Start(category) => {
                let epoch = self.restart(&mut state, category.clone());
                drop(state);
                return self.run_start(epoch, category).await;
            }
            Operation::Resume(resume) => resume,
        };

        let Some(ticket) = state.ticket() else {
            return Ok(Step::Ignored(Ignored::NoSession));
        };
        log::info!("retrying {resume:?} for session {}", ticket.session_id);
        state.phase = QuizPhase::Loading;
        state.clear_failure();
        self.publish(&state);
        drop(state);

        match resume {
            Resume::LoadQuestion => self.run_load(ticket).await,
            Resume::SubmitAnswer(choice) => self.run_answer(ticket, choice).await,
            Resume::FetchResult => self.run_result(ticket).await,
        }
    }

    /// Forget the current session. Responses still in flight are dropped when they land.
    pub async fn discard(&self) {
        let mut state = self.state.lock().await;
        if let Some(session) = &state.session {
            log::debug!("discarding session {}", session.id());
        }
        state.reset();
        self.publish(&state);
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    fn publish(&self, state: &SessionState) {
        if let Some(observer) = &self.observer {
            observer.on_change(&state.snapshot());
        }
    }

    fn restart(&self, state: &mut SessionState, category: Option<Category>) -> u64 {
        state.reset();
        state.requested = category;
        state.phase = QuizPhase::Loading;
        self.publish(state);
        state.epoch
    }

    /// Claim the request slot for the current session if the phase allows it.
    fn begin(&self, state: &mut SessionState, allowed: &[QuizPhase]) -> Result<Ticket, Ignored> {
        if state.phase == QuizPhase::Loading {
            return Err(Ignored::Busy);
        }
        let ticket = state.ticket().ok_or(Ignored::NoSession)?;
        if !allowed.contains(&state.phase) {
            return Err(Ignored::WrongPhase(state.phase));
        }
        state.phase = QuizPhase::Loading;
        self.publish(state);
        Ok(ticket)
    }

    async fn run_start(&self, epoch: u64, category: Option<Category>) -> Result<Step, ApiError> {
        log::info!(
            "starting quiz (category: {})",
            category.as_ref().map_or("default", Category::as_str)
        );
        let session_id = match self.api.start(category.as_ref()).await {
            Ok(session_id) => session_id,
            Err(err) => return self.fail(epoch, None, Operation::Start(category), err).await,
        };

        let ticket = {
            let mut state = self.state.lock().await;
            if !state.is_current(epoch, None) {
                log::debug!("dropping start response for abandoned session {session_id}");
                return Ok(Step::Ignored(Ignored::Stale));
            }
            state.session = Some(Session::new(session_id.clone(), category, self.clock.now()));
            Ticket { epoch, session_id }
        };
        self.run_load(ticket).await
    }

    async fn run_load(&self, ticket: Ticket) -> Result<Step, ApiError> {
        let fetch = match self.api.question(&ticket.session_id).await {
            Ok(fetch) => fetch,
            Err(err) => return self.fail_ticket(&ticket, Resume::LoadQuestion, err).await,
        };
        let (index, total, question) = match fetch {
            QuestionFetch::Finished => return self.run_result(ticket).await,
            QuestionFetch::Active {
                index,
                total,
                question,
            } => (index, total, question),
        };

        let mut state = self.state.lock().await;
        if !state.holds(&ticket) {
            return Ok(Step::Ignored(Ignored::Stale));
        }
        if let Some(session) = state.session.as_mut() {
            session.set_progress(index, total);
        }
        state.question = Some(question);
        state.answer = None;
        state.clear_failure();
        state.phase = QuizPhase::QuestionActive;
        self.publish(&state);
        log::debug!("question {index} of {total} for session {}", ticket.session_id);
        Ok(Step::Moved(QuizPhase::QuestionActive))
    }

    async fn run_answer(&self, ticket: Ticket, choice: usize) -> Result<Step, ApiError> {
        let outcome = match self.api.answer(&ticket.session_id, choice).await {
            Ok(outcome) => outcome,
            Err(err) => return self.fail_ticket(&ticket, Resume::SubmitAnswer(choice), err).await,
        };

        {
            let mut state = self.state.lock().await;
            if !state.holds(&ticket) {
                return Ok(Step::Ignored(Ignored::Stale));
            }
            let attempt = AnswerAttempt::new(choice, outcome.correct, outcome.correct_answers);
            if attempt.is_correct() {
                if let Some(session) = state.session.as_mut() {
                    session.record_correct();
                }
            }
            log::debug!(
                "choice {choice} graded {} for session {}",
                if attempt.is_correct() { "correct" } else { "wrong" },
                ticket.session_id
            );
            state.answer = Some(attempt);
            state.clear_failure();

            if !outcome.finished {
                state.phase = QuizPhase::AnswerRevealed;
                self.publish(&state);
                return Ok(Step::Moved(QuizPhase::AnswerRevealed));
            }
            if let Some(result) = outcome.result {
                return Ok(self.finish(&mut state, result));
            }
        }

        // finished without an embedded tally: ask for it
        self.run_result(ticket).await
    }

    async fn run_result(&self, ticket: Ticket) -> Result<Step, ApiError> {
        match self.api.result(&ticket.session_id).await {
            Ok(result) => {
                let mut state = self.state.lock().await;
                if !state.holds(&ticket) {
                    return Ok(Step::Ignored(Ignored::Stale));
                }
                Ok(self.finish(&mut state, result))
            }
            Err(err) => self.fail_ticket(&ticket, Resume::FetchResult, err).await,
        }
    }

    fn finish(&self, state: &mut SessionState, result: QuizResult) -> Step {
        let now = self.clock.now();
        if let Some(session) = state.session.as_mut() {
            session.finish(now);
            log::info!(
                "session {} finished: {}/{}",
                session.id(),
                result.score(),
                result.total()
            );
        }
        state.result = Some(result);
        state.clear_failure();
        state.phase = QuizPhase::Finished;
        self.publish(state);
        Step::Moved(QuizPhase::Finished)
    }

    async fn fail_ticket(
        &self,
        ticket: &Ticket,
        resume: Resume,
        err: ApiError,
    ) -> Result<Step, ApiError> {
        self.fail(
            ticket.epoch,
            Some(&ticket.session_id),
            Operation::Resume(resume),
            err,
        )
        .await
    }

    async fn fail(
        &self,
        epoch: u64,
        session_id: Option<&SessionId>,
        operation: Operation,
        err: ApiError,
    ) -> Result<Step, ApiError> {
        let mut state = self.state.lock().await;
        if !state.is_current(epoch, session_id) {
            log::debug!("dropping failure for abandoned session: {err}");
            return Ok(Step::Ignored(Ignored::Stale));
        }
        log::warn!("quiz request failed: {err}");
        state.phase = QuizPhase::Errored;
        state.failure = Some(Failure::from(&err));
        state.failed = Some(operation);
        self.publish(&state);
        Err(err)
    }
}

impl fmt::Debug for QuizSessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSessionController")
            .field("clock", &self.clock)
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}
