//! Task logger
//!
//! Entry point of the client: normalizes each write, merges it into the log
//! queue and arms the batch dispatcher.
//!
//! ```text
//! log(request) ──▶ Normalizer ──▶ LogQueue::merge ──▶ BatchDispatcher::schedule
//! log_iter/log_stream ──▶ TappedIter/TappedStream ──(per element)──▶ same path
//! ```

use super::dispatcher::{BatchDispatcher, FlushOutcome};
use super::feedback::{FeedbackRequest, SubmitFeedbackUseCase};
use super::shared::lock;
use super::stream_tap::{OkOnly, TapSink, TappedIter, TappedStream};
use crate::config::{ClientConfig, CredentialsError};
use crate::ports::transport::LogTransport;
use futures::Stream;
use phospho_domain::{
    DomainError, ExtractionError, Extensions, LogQueue, LogRecord, Normalizer, SessionId, TaskId,
    TaskWrite, ToStrFn, ValueKind, extract_metadata, unix_seconds,
};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors returned to callers of the logger
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error("Output of kind `{0}` is not iterable and cannot be streamed")]
    NotIterable(String),

    #[error("Extraction function failed: {0}")]
    Extraction(#[source] ExtractionError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ClientError {
    /// Errors caused by how the client was configured or called.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, ClientError::Credentials(_) | ClientError::NotIterable(_))
    }
}

/// One call to the logger.
#[derive(Clone)]
pub struct LogRequest {
    pub input: Value,
    /// `None` for an output that is not known yet, or for streamed calls.
    pub output: Option<Value>,
    /// Generated when absent.
    pub task_id: Option<TaskId>,
    pub session_id: Option<SessionId>,
    pub raw_input: Option<Value>,
    pub raw_output: Option<Value>,
    pub input_to_str: Option<ToStrFn>,
    pub output_to_str: Option<ToStrFn>,
    /// Fold raw outputs of streamed writes into a sequence (default: true).
    pub concatenate_raw_outputs: bool,
    pub extensions: Extensions,
}

impl LogRequest {
    pub fn new(input: impl Into<Value>) -> Self {
        Self {
            input: input.into(),
            output: None,
            task_id: None,
            session_id: None,
            raw_input: None,
            raw_output: None,
            input_to_str: None,
            output_to_str: None,
            concatenate_raw_outputs: true,
            extensions: Extensions::new(),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_output(mut self, output: impl Into<Value>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_task_id(mut self, task_id: impl Into<TaskId>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_raw_input(mut self, raw_input: impl Into<Value>) -> Self {
        self.raw_input = Some(raw_input.into());
        self
    }

    pub fn with_raw_output(mut self, raw_output: impl Into<Value>) -> Self {
        self.raw_output = Some(raw_output.into());
        self
    }

    pub fn with_input_to_str(mut self, f: ToStrFn) -> Self {
        self.input_to_str = Some(f);
        self
    }

    pub fn with_output_to_str(mut self, f: ToStrFn) -> Self {
        self.output_to_str = Some(f);
        self
    }

    pub fn with_concatenate_raw_outputs(mut self, enabled: bool) -> Self {
        self.concatenate_raw_outputs = enabled;
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Add one extension field. Reserved record field names are rejected.
    pub fn with_field(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, DomainError> {
        self.extensions.insert(key, value.into())?;
        Ok(self)
    }

    /// Split into the per-task template and the output pair.
    fn into_template(self) -> (WriteTemplate, Option<Value>, Option<Value>) {
        let mut normalizer = Normalizer::new();
        if let Some(f) = self.input_to_str {
            normalizer = normalizer.with_input_to_str(f);
        }
        if let Some(f) = self.output_to_str {
            normalizer = normalizer.with_output_to_str(f);
        }
        let template = WriteTemplate {
            task_id: self.task_id.unwrap_or_else(TaskId::generate),
            session_id: self.session_id,
            input: self.input,
            raw_input: self.raw_input,
            normalizer,
            extensions: self.extensions,
            concatenate_raw_outputs: self.concatenate_raw_outputs,
        };
        (template, self.output, self.raw_output)
    }
}

impl std::fmt::Debug for LogRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogRequest")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("task_id", &self.task_id)
            .field("session_id", &self.session_id)
            .field("raw_input", &self.raw_input)
            .field("raw_output", &self.raw_output)
            .field("input_to_str", &self.input_to_str.is_some())
            .field("output_to_str", &self.output_to_str.is_some())
            .field("concatenate_raw_outputs", &self.concatenate_raw_outputs)
            .field("extensions", &self.extensions)
            .finish()
    }
}

/// Everything a write needs besides the output itself.
///
/// Shared by all writes of a streamed task, so the task id is fixed here.
#[derive(Debug, Clone)]
struct WriteTemplate {
    task_id: TaskId,
    session_id: Option<SessionId>,
    input: Value,
    raw_input: Option<Value>,
    normalizer: Normalizer,
    extensions: Extensions,
    concatenate_raw_outputs: bool,
}

#[derive(Default)]
struct LatestIds {
    task: Option<TaskId>,
    session: Option<SessionId>,
}

struct LoggerInner {
    config: ClientConfig,
    queue: Arc<Mutex<LogQueue>>,
    dispatcher: BatchDispatcher,
    feedback: SubmitFeedbackUseCase,
    latest: Mutex<LatestIds>,
}

/// Client handle: logs tasks and submits feedback.
///
/// Cloning is cheap; clones share the queue, the dispatcher and the latest
/// task/session pointers.
#[derive(Clone)]
pub struct TaskLogger {
    inner: Arc<LoggerInner>,
}

impl TaskLogger {
    /// Create a logger.
    ///
    /// Missing credentials are not an error here; every log and feedback call
    /// reports them instead.
    pub fn new(config: ClientConfig, transport: Arc<dyn LogTransport>) -> Self {
        let queue = Arc::new(Mutex::new(LogQueue::new()));
        let dispatcher = BatchDispatcher::new(
            queue.clone(),
            transport.clone(),
            config.credentials().ok(),
            config.tick,
        );
        Self {
            inner: Arc::new(LoggerInner {
                config,
                queue,
                dispatcher,
                feedback: SubmitFeedbackUseCase::new(transport),
                latest: Mutex::new(LatestIds::default()),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ==================== Logging ====================

    /// Log a completed call. The record is ready to ship immediately.
    pub fn log(&self, request: LogRequest) -> Result<LogRecord, ClientError> {
        self.inner.config.credentials()?;
        let (template, output, raw_output) = request.into_template();
        self.write(&template, output.as_ref(), raw_output.as_ref(), true)
    }

    /// Log a call whose input and output resolve later.
    ///
    /// Both futures are awaited before the write. Their results replace the
    /// request's `input` and `output`. Concurrent calls for the same task
    /// merge in the order they resolve, not the order they were made.
    pub async fn log_deferred<I, O>(
        &self,
        mut request: LogRequest,
        input: I,
        output: O,
    ) -> Result<LogRecord, ClientError>
    where
        I: Future<Output = Value>,
        O: Future<Output = Option<Value>>,
    {
        self.inner.config.credentials()?;
        let (input, output) = futures::join!(input, output);
        request.input = input;
        request.output = output;
        self.log(request)
    }

    /// Run `call` on `args` and log the pair as one completed task.
    ///
    /// The serialized arguments are the input and the serialized result is
    /// the output. The result is returned unchanged; a failure to log it is
    /// only reported with a warning.
    pub async fn wrap<A, F, Fut, R>(&self, args: A, call: F) -> R
    where
        A: Serialize,
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = R>,
        R: Serialize,
    {
        let input = serde_json::to_value(&args);
        let result = call(args).await;

        let logged = match (input, serde_json::to_value(&result)) {
            (Ok(input), Ok(output)) => self
                .log(LogRequest::new(input).with_output(output))
                .map(|record| record.task_id),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to serialize wrapped call: {}", e);
                return result;
            }
        };
        match logged {
            Ok(task_id) => debug!(task_id = %task_id, "Logged wrapped call"),
            Err(e) => warn!("Failed to log wrapped call: {}", e),
        }
        result
    }

    /// Log a pull-driven streamed output.
    ///
    /// Every element becomes a partial write of the same task; exhausting the
    /// returned iterator marks the task ready. Dropping it early leaves the
    /// task unshipped.
    pub fn log_iter<I>(
        &self,
        request: LogRequest,
        output: I,
    ) -> Result<TappedIter<I::IntoIter, StreamWriter>, ClientError>
    where
        I: IntoIterator,
        I::Item: Serialize,
    {
        let writer = self.stream_writer(request)?;
        Ok(TappedIter::new(output.into_iter(), writer))
    }

    /// Log a push-driven streamed output. Same semantics as [`log_iter`](Self::log_iter).
    pub fn log_stream<S>(
        &self,
        request: LogRequest,
        output: S,
    ) -> Result<TappedStream<S, StreamWriter>, ClientError>
    where
        S: Stream,
        S::Item: Serialize,
    {
        let writer = self.stream_writer(request)?;
        Ok(TappedStream::new(output, writer))
    }

    /// Log a fallible stream. Errors reach the consumer but are not logged.
    pub fn log_try_stream<S, T, E>(
        &self,
        request: LogRequest,
        output: S,
    ) -> Result<TappedStream<S, OkOnly<StreamWriter>>, ClientError>
    where
        S: Stream<Item = Result<T, E>>,
        T: Serialize,
    {
        let writer = self.stream_writer(request)?;
        Ok(TappedStream::new(output, OkOnly(writer)))
    }

    /// Log the request's output as a stream.
    ///
    /// Only a JSON array can be streamed; each item is one element.
    pub fn log_sequence(
        &self,
        mut request: LogRequest,
    ) -> Result<TappedIter<std::vec::IntoIter<Value>, StreamWriter>, ClientError> {
        let items = match request.output.take() {
            Some(Value::Array(items)) => items,
            other => {
                let kind = other.as_ref().map_or(ValueKind::Null, ValueKind::of);
                return Err(ClientError::NotIterable(kind.as_str().to_string()));
            }
        };
        self.log_iter(request, items)
    }

    fn stream_writer(&self, request: LogRequest) -> Result<StreamWriter, ClientError> {
        self.inner.config.credentials()?;
        let (template, _, raw_output) = request.into_template();
        debug!(task_id = %template.task_id, "Streaming task output");
        Ok(StreamWriter {
            logger: self.clone(),
            template,
            raw_output,
        })
    }

    /// Normalize one write and merge it into the queue.
    fn write(
        &self,
        template: &WriteTemplate,
        output: Option<&Value>,
        raw_output: Option<&Value>,
        is_terminal: bool,
    ) -> Result<LogRecord, ClientError> {
        let credentials = self.inner.config.credentials()?;
        let normalized = template
            .normalizer
            .normalize(&template.input, output, template.raw_input.as_ref(), raw_output)
            .map_err(ClientError::Extraction)?;
        let metadata = extract_metadata(&template.input, output);

        {
            let mut latest = lock(&self.inner.latest);
            latest.task = Some(template.task_id.clone());
            latest.session = template.session_id.clone();
        }

        let record = lock(&self.inner.queue).merge(TaskWrite {
            task_id: template.task_id.clone(),
            session_id: template.session_id.clone(),
            project_id: credentials.project_id,
            created_at: unix_seconds(),
            normalized,
            metadata,
            extensions: template.extensions.clone(),
            concatenate_raw_outputs: template.concatenate_raw_outputs,
            is_terminal,
        });
        debug!(task_id = %record.task_id, is_terminal, "Merged task write");

        self.inner.dispatcher.schedule();
        Ok(record)
    }

    // ==================== Sessions ====================

    /// Start a new session and make it the latest one.
    pub fn new_session(&self) -> SessionId {
        let session = SessionId::generate();
        lock(&self.inner.latest).session = Some(session.clone());
        session
    }

    /// Reserve a new task id and make it the latest one.
    pub fn new_task(&self) -> TaskId {
        let task = TaskId::generate();
        lock(&self.inner.latest).task = Some(task.clone());
        task
    }

    pub fn latest_task_id(&self) -> Option<TaskId> {
        lock(&self.inner.latest).task.clone()
    }

    pub fn latest_session_id(&self) -> Option<SessionId> {
        lock(&self.inner.latest).session.clone()
    }

    // ==================== Feedback & Dispatch ====================

    /// Flag a task as success or failure.
    ///
    /// Resolves to the collector's updated task, or `None` when nothing was
    /// sent or the call failed.
    pub async fn submit_feedback(
        &self,
        request: FeedbackRequest,
    ) -> Result<Option<Value>, ClientError> {
        let credentials = self.inner.config.credentials()?;
        Ok(self.inner.feedback.execute(&credentials, request).await)
    }

    /// Flush ready records now instead of waiting for the debounce window.
    pub async fn flush(&self) -> FlushOutcome {
        self.inner.dispatcher.flush().await
    }

    /// Number of tasks currently queued (ready or not).
    pub fn pending(&self) -> usize {
        self.inner.dispatcher.pending()
    }
}

/// Sink feeding tapped elements of one task into the logger.
pub struct StreamWriter {
    logger: TaskLogger,
    template: WriteTemplate,
    /// Caller override stored as the raw fragment of every element.
    raw_output: Option<Value>,
}

impl StreamWriter {
    /// Task every element is merged into.
    pub fn task_id(&self) -> &TaskId {
        &self.template.task_id
    }

    fn record(&self, output: Option<&Value>, is_terminal: bool) {
        // The completion sentinel carries no raw fragment
        let raw_output = output.and(self.raw_output.as_ref());
        if let Err(e) = self.logger.write(&self.template, output, raw_output, is_terminal) {
            warn!(task_id = %self.template.task_id, "Failed to log streamed element: {}", e);
        }
    }
}

impl<T: Serialize> TapSink<T> for StreamWriter {
    fn write(&self, element: Option<&T>, is_terminal: bool) {
        match element {
            Some(element) => match serde_json::to_value(element) {
                Ok(value) => self.record(Some(&value), is_terminal),
                Err(e) => warn!(
                    task_id = %self.template.task_id,
                    "Failed to serialize streamed element: {}", e
                ),
            },
            None => self.record(None, is_terminal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::dispatcher::tests::MockTransport;
    use futures::StreamExt;
    use phospho_domain::{Flag, RawOutput};
    use serde_json::json;
    use std::time::Duration;

    fn config() -> ClientConfig {
        ClientConfig::default()
            .with_api_key("key")
            .with_project_id("proj")
    }

    fn logger() -> (TaskLogger, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::default());
        (TaskLogger::new(config(), transport.clone()), transport)
    }

    fn chunk(content: &str) -> Value {
        json!({"choices": [{"delta": {"content": content}}]})
    }

    #[tokio::test(start_paused = true)]
    async fn log_ships_after_quiet_period() {
        let (logger, transport) = logger();

        let record = logger
            .log(LogRequest::new("question").with_output("answer").with_task_id("t1"))
            .unwrap();
        assert_eq!(record.output.as_deref(), Some("answer"));
        assert_eq!(record.project_id, "proj");
        assert_eq!(logger.pending(), 1);

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(transport.batch_count(), 1);
        assert_eq!(transport.batch(0)[0].task_id, TaskId::new("t1"));
        assert_eq!(logger.pending(), 0);
    }

    #[tokio::test]
    async fn missing_credentials_is_a_usage_error() {
        let logger = TaskLogger::new(
            ClientConfig::default().with_project_id("proj"),
            Arc::new(MockTransport::default()),
        );

        let err = logger.log(LogRequest::new("q").with_output("a")).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Credentials(CredentialsError::MissingApiKey)
        ));
        assert!(err.is_usage_error());
        assert_eq!(logger.pending(), 0);
    }

    #[tokio::test]
    async fn extraction_errors_propagate() {
        let (logger, _) = logger();
        let failing: ToStrFn = Arc::new(|_: &Value| -> Result<String, ExtractionError> {
            Err("cannot read this".into())
        });

        let err = logger
            .log(
                LogRequest::new(json!({"prompt": 1}))
                    .with_output("a")
                    .with_input_to_str(failing),
            )
            .unwrap_err();
        assert!(matches!(err, ClientError::Extraction(_)));
        assert!(!err.is_usage_error());
    }

    #[test]
    fn reserved_extension_fields_are_rejected() {
        let err = LogRequest::new("q").with_field("output", "x").unwrap_err();
        assert!(err.is_reserved_field());

        let request = LogRequest::new("q").with_field("user_id", "u-1").unwrap();
        assert_eq!(request.extensions.get("user_id"), Some(&json!("u-1")));
    }

    #[tokio::test(start_paused = true)]
    async fn streamed_iter_merges_into_one_task() {
        let (logger, transport) = logger();

        let tapped = logger
            .log_iter(
                LogRequest::new("say hello").with_task_id("stream"),
                vec![chunk("Hel"), chunk("lo")],
            )
            .unwrap();
        assert_eq!(tapped.sink().task_id(), &TaskId::new("stream"));

        let seen: Vec<Value> = tapped.collect();
        assert_eq!(seen, vec![chunk("Hel"), chunk("lo")]);

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(transport.batch_count(), 1);
        let record = &transport.batch(0)[0];
        assert_eq!(record.output.as_deref(), Some("Hello"));
        assert_eq!(
            record.raw_output,
            RawOutput::Fragments(vec![chunk("Hel"), chunk("lo")])
        );
        assert_eq!(record.usage.map(|u| u.completion_tokens), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_stream_is_never_shipped() {
        let (logger, transport) = logger();

        let mut tapped = logger
            .log_iter(LogRequest::new("q").with_task_id("cut"), vec!["a", "b", "c"])
            .unwrap();
        tapped.next();
        drop(tapped);

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(transport.batch_count(), 0);
        assert_eq!(logger.pending(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn streamed_futures_stream_is_transparent() {
        let (logger, transport) = logger();

        let source = futures::stream::iter(vec!["a", "b"]);
        let tapped = logger
            .log_stream(LogRequest::new("q").with_task_id("s"), source)
            .unwrap();
        let seen: Vec<&str> = tapped.collect().await;
        assert_eq!(seen, vec!["a", "b"]);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(transport.batch(0)[0].output.as_deref(), Some("ab"));
    }

    #[tokio::test(start_paused = true)]
    async fn stream_errors_reach_consumer_unlogged() {
        let (logger, transport) = logger();

        let source = futures::stream::iter(vec![Ok("a"), Err("boom"), Ok("b")]);
        let tapped = logger
            .log_try_stream(LogRequest::new("q").with_task_id("s"), source)
            .unwrap();
        let seen: Vec<Result<&str, &str>> = tapped.collect().await;
        assert_eq!(seen, vec![Ok("a"), Err("boom"), Ok("b")]);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(transport.batch(0)[0].output.as_deref(), Some("ab"));
    }

    #[tokio::test]
    async fn log_sequence_requires_an_array() {
        let (logger, _) = logger();

        let err = logger
            .log_sequence(LogRequest::new("q").with_output("not a list"))
            .unwrap_err();
        assert!(matches!(err, ClientError::NotIterable(ref kind) if kind == "string"));
        assert!(err.is_usage_error());

        let seen: Vec<Value> = logger
            .log_sequence(LogRequest::new("q").with_output(json!(["x", "y"])))
            .unwrap()
            .collect();
        assert_eq!(seen, vec![json!("x"), json!("y")]);
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_values_are_resolved_first() {
        let (logger, transport) = logger();

        let record = logger
            .log_deferred(
                LogRequest::new(Value::Null).with_task_id("d"),
                async { json!("late question") },
                async { Some(json!("late answer")) },
            )
            .await
            .unwrap();
        assert_eq!(record.input, "late question");
        assert_eq!(record.output.as_deref(), Some("late answer"));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(transport.batch_count(), 1);
    }

    #[tokio::test]
    async fn latest_pointers_follow_writes() {
        let (logger, _) = logger();
        assert_eq!(logger.latest_task_id(), None);

        let session = logger.new_session();
        assert_eq!(logger.latest_session_id(), Some(session.clone()));

        logger
            .log(
                LogRequest::new("q")
                    .with_output("a")
                    .with_task_id("t1")
                    .with_session_id(session.clone()),
            )
            .unwrap();
        assert_eq!(logger.latest_task_id(), Some(TaskId::new("t1")));
        assert_eq!(logger.latest_session_id(), Some(session));

        logger
            .log(LogRequest::new("q").with_output("a").with_task_id("t2"))
            .unwrap();
        assert_eq!(logger.latest_session_id(), None);

        let task = logger.new_task();
        assert_eq!(logger.latest_task_id(), Some(task));
    }

    #[tokio::test]
    async fn explicit_flush_ships_immediately() {
        let (logger, transport) = logger();
        logger.log(LogRequest::new("q").with_output("a")).unwrap();

        assert_eq!(logger.flush().await, FlushOutcome::Sent { events: 1 });
        assert_eq!(transport.batch_count(), 1);
        assert_eq!(logger.flush().await, FlushOutcome::Skipped);
    }

    #[tokio::test]
    async fn feedback_goes_through_the_transport() {
        let (logger, transport) = logger();

        let task = logger
            .submit_feedback(FeedbackRequest::new("t1").with_raw_flag("👍"))
            .await
            .unwrap();
        assert!(task.is_some());
        assert_eq!(transport.feedback.lock().unwrap()[0].1.flag, Flag::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn raw_output_override_applies_to_streamed_elements() {
        let (logger, transport) = logger();

        let tapped = logger
            .log_iter(
                LogRequest::new("q")
                    .with_task_id("raw")
                    .with_raw_output(json!({"provider": "custom"}))
                    .with_concatenate_raw_outputs(false),
                vec!["a", "b"],
            )
            .unwrap();
        let _: Vec<&str> = tapped.collect();

        tokio::time::sleep(Duration::from_millis(600)).await;
        let record = &transport.batch(0)[0];
        assert_eq!(record.output.as_deref(), Some("ab"));
        assert_eq!(
            record.raw_output,
            RawOutput::Single(json!({"provider": "custom"}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wrap_logs_args_and_result() {
        let (logger, transport) = logger();

        let sum = logger.wrap((2, 3), |(a, b)| async move { a + b }).await;
        assert_eq!(sum, 5);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(transport.batch_count(), 1);
        let record = &transport.batch(0)[0];
        assert_eq!(record.raw_input, json!([2, 3]));
        assert_eq!(record.output.as_deref(), Some("5"));
        assert_eq!(logger.latest_task_id(), Some(record.task_id.clone()));
    }

    #[tokio::test]
    async fn wrap_returns_result_even_when_logging_fails() {
        let logger = TaskLogger::new(
            ClientConfig::default(),
            Arc::new(MockTransport::default()),
        );

        let answer = logger.wrap("question", |q| async move { q.len() }).await;
        assert_eq!(answer, 8);
        assert_eq!(logger.pending(), 0);
    }
}
