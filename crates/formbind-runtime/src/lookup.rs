#![forbid(unsafe_code)]

//! Remote catalog lookups.
//!
//! A component that needs data from a federated search submits a
//! [`QueryRequest`] to a [`QueryService`] and holds the returned
//! [`InFlightQuery`]. The service answers through a [`QueryReply`] channel,
//! possibly from another thread; the component polls for the outcome.
//!
//! # Ownership
//!
//! One component owns at most one [`InFlightQuery`]. Cancelling it (or
//! dropping it) calls [`QueryService::cancel`] and raises the
//! [`CancelSignal`], after which every delivery through the reply is refused.
//! A cancelled query can never produce a late outcome.
//!
//! # Timeouts
//!
//! The deadline is fixed at [`InFlightQuery::start`]. A poll at or after the
//! deadline with no outcome cancels the query and reports
//! [`LookupPoll::TimedOut`]. A timeout too large to represent as an
//! [`Instant`] means the query never times out.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use formbind_core::Document;

/// Identifier assigned by a [`QueryService`] on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryId(pub u64);

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Which sources a query fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Federation {
    /// The local catalog only.
    #[default]
    Local,
    /// Every connected source.
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Case-insensitive pattern match.
    ILike,
    Equals,
}

/// A single property comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub property: String,
    pub op: FilterOp,
    pub value: String,
}

impl Filter {
    pub fn ilike(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            op: FilterOp::ILike,
            value: value.into(),
        }
    }

    pub fn equals(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            op: FilterOp::Equals,
            value: value.into(),
        }
    }

    /// Render as a CQL expression, e.g. `"title" ILIKE 'abc'`.
    ///
    /// Quotes inside the property or the value are doubled.
    #[must_use]
    pub fn to_cql(&self) -> String {
        let op = match self.op {
            FilterOp::ILike => "ILIKE",
            FilterOp::Equals => "=",
        };
        format!(
            "\"{}\" {op} '{}'",
            self.property.replace('"', "\"\""),
            self.value.replace('\'', "''")
        )
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cql())
    }
}

/// A query submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub filter: Filter,
    pub federation: Federation,
    /// Maximum number of results wanted.
    pub count: usize,
}

impl QueryRequest {
    #[must_use]
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            federation: Federation::Local,
            count: 1,
        }
    }

    #[must_use]
    pub fn federation(mut self, federation: Federation) -> Self {
        self.federation = federation;
        self
    }

    #[must_use]
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// What a service eventually answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Results(Vec<Document>),
    Failed(String),
}

impl QueryOutcome {
    /// First result, if the query succeeded with any.
    #[must_use]
    pub fn first(&self) -> Option<&Document> {
        match self {
            Self::Results(docs) => docs.first(),
            Self::Failed(_) => None,
        }
    }
}

/// Read side of a cancellation flag.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    inner: Arc<AtomicBool>,
}

impl CancelSignal {
    /// Create a (signal, trigger) pair.
    #[must_use]
    pub fn new() -> (Self, CancelTrigger) {
        let inner = Arc::new(AtomicBool::new(false));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            CancelTrigger { inner },
        )
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

/// Write side of a cancellation flag.
#[derive(Debug)]
pub struct CancelTrigger {
    inner: Arc<AtomicBool>,
}

impl CancelTrigger {
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Release);
    }
}

/// Channel a service answers through.
#[derive(Debug, Clone)]
pub struct QueryReply {
    sender: mpsc::Sender<QueryOutcome>,
    signal: CancelSignal,
}

impl QueryReply {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.signal.is_cancelled()
    }

    /// Deliver results. Returns `false` if the query was cancelled or its
    /// owner is gone.
    pub fn deliver(&self, results: Vec<Document>) -> bool {
        self.send(QueryOutcome::Results(results))
    }

    /// Report a failure. Same return contract as [`Self::deliver`].
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.send(QueryOutcome::Failed(reason.into()))
    }

    fn send(&self, outcome: QueryOutcome) -> bool {
        if self.signal.is_cancelled() {
            return false;
        }
        self.sender.send(outcome).is_ok()
    }
}

/// Errors raised when a query cannot be submitted at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    Rejected(String),
    Unavailable,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "query rejected: {reason}"),
            Self::Unavailable => write!(f, "query service unavailable"),
        }
    }
}

impl std::error::Error for LookupError {}

/// A remote search endpoint.
pub trait QueryService {
    /// Accept a query. The outcome is sent through `reply`, now or later.
    fn submit(&self, request: QueryRequest, reply: QueryReply) -> Result<QueryId, LookupError>;

    /// Abandon a query. Unknown or finished ids are ignored.
    fn cancel(&self, id: QueryId);
}

/// Result of polling an [`InFlightQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupPoll {
    /// No outcome yet, deadline not reached.
    Pending,
    Done(QueryOutcome),
    /// The deadline passed; the query has been cancelled.
    TimedOut,
    /// The query was cancelled by its owner.
    Cancelled,
    /// A terminal result was already returned by an earlier poll.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Active,
    Finished,
    Cancelled,
}

/// One outstanding query owned by a component.
pub struct InFlightQuery {
    id: QueryId,
    service: Arc<dyn QueryService>,
    receiver: mpsc::Receiver<QueryOutcome>,
    trigger: CancelTrigger,
    deadline: Option<Instant>,
    status: Status,
}

impl fmt::Debug for InFlightQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlightQuery")
            .field("id", &self.id)
            .field("deadline", &self.deadline)
            .field("status", &self.status)
            .finish()
    }
}

impl InFlightQuery {
    /// Submit `request` and start the deadline clock at `now`.
    ///
    /// # Errors
    ///
    /// Whatever the service returns from [`QueryService::submit`].
    pub fn start(
        service: Arc<dyn QueryService>,
        request: QueryRequest,
        timeout: Duration,
        now: Instant,
    ) -> Result<Self, LookupError> {
        let (sender, receiver) = mpsc::channel();
        let (signal, trigger) = CancelSignal::new();
        let filter = request.filter.to_cql();
        let id = service.submit(request, QueryReply { sender, signal })?;
        tracing::debug!(query = %id, %filter, timeout_ms = timeout.as_millis() as u64, "lookup submitted");
        Ok(Self {
            id,
            service,
            receiver,
            trigger,
            deadline: now.checked_add(timeout),
            status: Status::Active,
        })
    }

    #[must_use]
    pub fn id(&self) -> QueryId {
        self.id
    }

    /// `None` when the query has no deadline.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Check for an outcome without blocking.
    pub fn poll(&mut self, now: Instant) -> LookupPoll {
        match self.status {
            Status::Cancelled => return LookupPoll::Cancelled,
            Status::Finished => return LookupPoll::Closed,
            Status::Active => {}
        }
        match self.receiver.try_recv() {
            Ok(outcome) => {
                self.status = Status::Finished;
                match &outcome {
                    QueryOutcome::Results(docs) => {
                        tracing::info!(query = %self.id, results = docs.len(), "lookup completed");
                    }
                    QueryOutcome::Failed(reason) => {
                        tracing::warn!(query = %self.id, %reason, "lookup failed");
                    }
                }
                LookupPoll::Done(outcome)
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                self.status = Status::Finished;
                tracing::warn!(query = %self.id, "lookup dropped without an answer");
                LookupPoll::Done(QueryOutcome::Failed("query dropped".into()))
            }
            Err(mpsc::TryRecvError::Empty) if self.deadline.is_some_and(|d| now >= d) => {
                tracing::warn!(query = %self.id, "lookup timed out");
                self.abandon();
                self.status = Status::Finished;
                LookupPoll::TimedOut
            }
            Err(mpsc::TryRecvError::Empty) => LookupPoll::Pending,
        }
    }

    /// Cancel the query. No-op once finished or already cancelled.
    pub fn cancel(&mut self) {
        if self.status != Status::Active {
            return;
        }
        tracing::debug!(query = %self.id, "lookup cancelled");
        self.abandon();
        self.status = Status::Cancelled;
    }

    fn abandon(&self) {
        self.trigger.cancel();
        self.service.cancel(self.id);
    }
}

impl Drop for InFlightQuery {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Default)]
struct ManualState {
    next_id: u64,
    submitted: Vec<(QueryId, QueryRequest)>,
    open: HashMap<QueryId, QueryReply>,
    cancelled: Vec<QueryId>,
    reject: Option<String>,
}

/// Service whose queries are answered by hand. Used in tests and demos.
#[derive(Default)]
pub struct ManualQueryService {
    state: Mutex<ManualState>,
}

impl ManualQueryService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later submission fail with [`LookupError::Rejected`].
    pub fn reject_submissions(&self, reason: impl Into<String>) {
        self.lock().reject = Some(reason.into());
    }

    /// Requests seen so far, oldest first.
    #[must_use]
    pub fn submitted(&self) -> Vec<(QueryId, QueryRequest)> {
        self.lock().submitted.clone()
    }

    #[must_use]
    pub fn cancelled(&self) -> Vec<QueryId> {
        self.lock().cancelled.clone()
    }

    /// Ids that are neither answered nor cancelled.
    #[must_use]
    pub fn open_ids(&self) -> Vec<QueryId> {
        let mut ids: Vec<_> = self.lock().open.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Answer `id` with `results`. Returns whether the owner accepted it.
    pub fn complete(&self, id: QueryId, results: Vec<Document>) -> bool {
        self.lock().open.remove(&id).is_some_and(|r| r.deliver(results))
    }

    /// Answer `id` with a failure.
    pub fn fail(&self, id: QueryId, reason: impl Into<String>) -> bool {
        self.lock().open.remove(&id).is_some_and(|r| r.fail(reason))
    }

    /// Answer `id` even if it was cancelled. Always refused by a cancelled owner.
    pub fn complete_late(&self, id: QueryId, reply: &QueryReply, results: Vec<Document>) -> bool {
        self.lock().open.remove(&id);
        reply.deliver(results)
    }

    /// Reply handle for an open query, for simulating late answers.
    #[must_use]
    pub fn reply_for(&self, id: QueryId) -> Option<QueryReply> {
        self.lock().open.get(&id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl QueryService for ManualQueryService {
    fn submit(&self, request: QueryRequest, reply: QueryReply) -> Result<QueryId, LookupError> {
        let mut state = self.lock();
        if let Some(reason) = &state.reject {
            return Err(LookupError::Rejected(reason.clone()));
        }
        state.next_id += 1;
        let id = QueryId(state.next_id);
        state.submitted.push((id, request));
        state.open.insert(id, reply);
        Ok(id)
    }

    fn cancel(&self, id: QueryId) {
        let mut state = self.lock();
        state.open.remove(&id);
        state.cancelled.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn start(service: &Arc<ManualQueryService>, now: Instant) -> InFlightQuery {
        let svc: Arc<dyn QueryService> = service.clone();
        InFlightQuery::start(
            svc,
            QueryRequest::new(Filter::ilike("ext.alternate-identifier-value", "abc"))
                .federation(Federation::Enterprise),
            TIMEOUT,
            now,
        )
        .unwrap()
    }

    #[test]
    fn cql_quotes_are_doubled() {
        assert_eq!(Filter::ilike("title", "it's").to_cql(), "\"title\" ILIKE 'it''s'");
        assert_eq!(Filter::equals("a\"b", "x").to_cql(), "\"a\"\"b\" = 'x'");
    }

    #[test]
    fn delivers_once_then_closes() {
        let service = Arc::new(ManualQueryService::new());
        let now = Instant::now();
        let mut q = start(&service, now);
        assert_eq!(q.poll(now), LookupPoll::Pending);

        let doc = Document::leaf("hit");
        assert!(service.complete(q.id(), vec![doc.clone()]));
        assert_eq!(q.poll(now), LookupPoll::Done(QueryOutcome::Results(vec![doc])));
        assert_eq!(q.poll(now), LookupPoll::Closed);
        assert!(!q.is_active());
        drop(q);
        assert!(service.cancelled().is_empty());
    }

    #[test]
    fn cancel_refuses_late_delivery() {
        let service = Arc::new(ManualQueryService::new());
        let now = Instant::now();
        let mut q = start(&service, now);
        let id = q.id();
        let reply = service.reply_for(id).unwrap();
        q.cancel();
        assert!(reply.is_cancelled());
        assert!(!service.complete_late(id, &reply, vec![Document::leaf("late")]));
        assert_eq!(q.poll(now), LookupPoll::Cancelled);
        assert_eq!(service.cancelled(), vec![id]);
    }

    #[test]
    fn drop_cancels_active_query() {
        let service = Arc::new(ManualQueryService::new());
        let q = start(&service, Instant::now());
        let id = q.id();
        drop(q);
        assert_eq!(service.cancelled(), vec![id]);
        assert!(service.open_ids().is_empty());
    }

    #[test]
    fn deadline_times_out_and_cancels() {
        let service = Arc::new(ManualQueryService::new());
        let now = Instant::now();
        let mut q = start(&service, now);
        assert_eq!(q.poll(now + TIMEOUT - Duration::from_millis(1)), LookupPoll::Pending);
        assert_eq!(q.poll(now + TIMEOUT), LookupPoll::TimedOut);
        assert_eq!(service.cancelled(), vec![q.id()]);
        assert_eq!(q.poll(now + TIMEOUT), LookupPoll::Closed);
    }

    #[test]
    fn unrepresentable_timeout_never_expires() {
        let service = Arc::new(ManualQueryService::new());
        let svc: Arc<dyn QueryService> = service.clone();
        let now = Instant::now();
        let mut q = InFlightQuery::start(
            svc,
            QueryRequest::new(Filter::ilike("a", "b")),
            Duration::MAX,
            now,
        )
        .unwrap();
        assert_eq!(q.deadline(), None);
        assert_eq!(q.poll(now + Duration::from_secs(365 * 24 * 3600)), LookupPoll::Pending);
        assert!(service.cancelled().is_empty());
        assert!(service.complete(q.id(), Vec::new()));
        assert_eq!(q.poll(now), LookupPoll::Done(QueryOutcome::Results(Vec::new())));
    }

    #[test]
    fn failure_is_an_outcome() {
        let service = Arc::new(ManualQueryService::new());
        let now = Instant::now();
        let mut q = start(&service, now);
        assert!(service.fail(q.id(), "source offline"));
        assert_eq!(
            q.poll(now),
            LookupPoll::Done(QueryOutcome::Failed("source offline".into()))
        );
    }

    #[test]
    fn rejected_submission() {
        let service = Arc::new(ManualQueryService::new());
        service.reject_submissions("no sources");
        let svc: Arc<dyn QueryService> = service.clone();
        let err = InFlightQuery::start(
            svc,
            QueryRequest::new(Filter::ilike("a", "b")),
            TIMEOUT,
            Instant::now(),
        )
        .unwrap_err();
        assert_eq!(err, LookupError::Rejected("no sources".into()));
        assert_eq!(err.to_string(), "query rejected: no sources");
    }

    #[test]
    fn reply_from_other_thread() {
        let service = Arc::new(ManualQueryService::new());
        let now = Instant::now();
        let mut q = start(&service, now);
        let id = q.id();
        let remote = Arc::clone(&service);
        std::thread::spawn(move || remote.complete(id, Vec::new()))
            .join()
            .unwrap();
        assert_eq!(q.poll(now), LookupPoll::Done(QueryOutcome::Results(Vec::new())));
    }
}
