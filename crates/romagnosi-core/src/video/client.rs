use std::sync::Arc;

use tokio::{
    sync::mpsc::UnboundedSender,
    time::{Instant, sleep, timeout_at},
};
use tracing::{debug, error, info, warn};

use crate::{
    api::{ApiError, GeminiClient},
    video::{
        Artifact, ArtifactRef, AspectRatio, GenerationJob, GenerationRequest, ImageInput,
        JobHandle, JobProgress, JobState, JobStatus, PollPolicy, VideoBackend, VideoError,
    },
};

type Progress<'a> = Option<&'a UnboundedSender<JobProgress>>;

fn emit(progress: Progress<'_>, event: JobProgress) {
    if let Some(tx) = progress {
        // A closed receiver only means nobody is watching any more
        let _ = tx.send(event);
    }
}

/// Run `fut` to completion, or until `deadline` passes
async fn within<F: Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => timeout_at(deadline, fut).await.ok(),
        None => Some(fut.await),
    }
}

fn timed_out(
    handle: &JobHandle,
    attempts: u32,
    started: Instant,
    progress: Progress<'_>,
) -> VideoError {
    let elapsed = started.elapsed();
    warn!(job_id = %handle.id, attempts, ?elapsed, "video job timed out");
    emit(progress, JobProgress::TimedOut { elapsed });
    VideoError::Timeout {
        operation: handle.operation.clone(),
        attempts,
        elapsed,
    }
}

/// Submits image-to-video jobs and follows them to completion.
pub struct VideoClient<B = GeminiClient> {
    backend: Arc<B>,
}

impl<B> Clone for VideoClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: VideoBackend> VideoClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Send one creation request. Returns as soon as the remote accepted it.
    pub async fn submit(
        &self,
        image: ImageInput,
        prompt: impl Into<String>,
        aspect_ratio: AspectRatio,
    ) -> Result<JobHandle, VideoError> {
        let request = GenerationRequest::new(image, prompt, aspect_ratio);
        self.submit_request(&request).await
    }

    pub async fn submit_request(&self, request: &GenerationRequest) -> Result<JobHandle, VideoError> {
        request.image.validate()?;

        let operation = self
            .backend
            .create_operation(request)
            .await
            .map_err(|e| {
                error!("Video submission rejected: {}", e);
                VideoError::Submission {
                    reason: e.to_string(),
                    source: Some(e),
                }
            })?;

        let handle = JobHandle::new(operation);
        info!(
            job_id = %handle.id,
            operation = %handle.operation,
            aspect_ratio = %request.aspect_ratio,
            "video job submitted"
        );
        Ok(handle)
    }

    /// Single status query. Once a terminal status has been seen for this
    /// handle it is returned again without another request.
    pub async fn poll(&self, handle: &JobHandle) -> Result<JobStatus, VideoError> {
        if let Some(status) = handle.terminal_status() {
            return Ok(status.clone());
        }

        let operation = self
            .backend
            .fetch_operation(&handle.operation)
            .await
            .map_err(|source| VideoError::Polling {
                operation: handle.operation.clone(),
                source,
            })?;

        Ok(handle.settle(operation.status()))
    }

    pub async fn await_completion(
        &self,
        handle: &JobHandle,
        policy: &PollPolicy,
    ) -> Result<Artifact, VideoError> {
        self.await_completion_with_progress(handle, policy, None)
            .await
    }

    /// Poll until the job is terminal, the policy's bound is hit, or the
    /// future is dropped. Dropping only stops local observation; the remote
    /// job keeps running.
    pub async fn await_completion_with_progress(
        &self,
        handle: &JobHandle,
        policy: &PollPolicy,
        progress: Progress<'_>,
    ) -> Result<Artifact, VideoError> {
        self.follow(handle, policy, progress, None).await
    }

    /// Polling loop. `state` moves to `Pending` once the remote has
    /// acknowledged the job with a first non-terminal status.
    async fn follow(
        &self,
        handle: &JobHandle,
        policy: &PollPolicy,
        progress: Progress<'_>,
        mut state: Option<&mut JobState>,
    ) -> Result<Artifact, VideoError> {
        let started = Instant::now();
        let deadline = policy.timeout.map(|timeout| started + timeout);
        let max_attempts = policy.effective_max_attempts();
        let mut attempt: u32 = 0;
        let mut consecutive_failures: u32 = 0;

        loop {
            attempt += 1;

            let Some(polled) = within(deadline, self.poll(handle)).await else {
                return Err(timed_out(handle, attempt, started, progress));
            };

            match polled {
                Ok(JobStatus::Pending) => {
                    consecutive_failures = 0;
                    if let Some(state) = state.as_deref_mut() {
                        *state = JobState::Pending;
                    }
                    let elapsed = started.elapsed();
                    debug!(job_id = %handle.id, attempt, ?elapsed, "video job pending");
                    emit(progress, JobProgress::Pending { attempt, elapsed });
                }
                Ok(JobStatus::Completed(artifact_ref)) => {
                    info!(job_id = %handle.id, attempt, "video job completed");
                    let Some(downloaded) = within(
                        deadline,
                        self.download_with_retry(&artifact_ref, policy, progress),
                    )
                    .await
                    else {
                        return Err(timed_out(handle, attempt, started, progress));
                    };
                    let artifact = downloaded.inspect_err(|e| {
                        emit(progress, JobProgress::Failed { cause: e.to_string() })
                    })?;

                    emit(
                        progress,
                        JobProgress::Completed {
                            bytes: artifact.bytes.len(),
                        },
                    );
                    return Ok(artifact);
                }
                Ok(JobStatus::Failed(cause)) => {
                    warn!(job_id = %handle.id, %cause, "video job failed");
                    emit(progress, JobProgress::Failed { cause: cause.clone() });
                    return Err(VideoError::JobFailed {
                        operation: handle.operation.clone(),
                        cause,
                    });
                }
                Err(VideoError::Polling { source, .. })
                    if source.is_transient() && consecutive_failures < policy.max_poll_retries =>
                {
                    consecutive_failures += 1;
                    warn!(
                        job_id = %handle.id,
                        attempt,
                        consecutive_failures,
                        "transient failure reading job status: {}",
                        source
                    );
                    emit(
                        progress,
                        JobProgress::Retrying {
                            attempt,
                            reason: source.to_string(),
                        },
                    );
                }
                Err(e) => {
                    error!(job_id = %handle.id, "giving up on video job: {}", e);
                    emit(progress, JobProgress::Failed { cause: e.to_string() });
                    return Err(e);
                }
            }

            let out_of_attempts = max_attempts.is_some_and(|max| attempt >= max);
            let past_deadline = deadline.is_some_and(|deadline| Instant::now() >= deadline);
            if out_of_attempts || past_deadline {
                return Err(timed_out(handle, attempt, started, progress));
            }

            let mut delay = policy.next_delay(attempt - 1);
            if let Some(deadline) = deadline {
                delay = delay.min(deadline.saturating_duration_since(Instant::now()));
            }
            sleep(delay).await;
        }
    }

    /// Submit `job` and follow it to a terminal state, keeping `job.state` current
    pub async fn generate(
        &self,
        job: &mut GenerationJob,
        policy: &PollPolicy,
        progress: Progress<'_>,
    ) -> Result<Artifact, VideoError> {
        let handle = match self.submit_request(&job.request).await {
            Ok(handle) => handle,
            Err(e) => {
                job.state = JobState::Failed;
                emit(progress, JobProgress::Failed { cause: e.to_string() });
                return Err(e);
            }
        };

        emit(
            progress,
            JobProgress::Submitted {
                operation: handle.operation.clone(),
            },
        );
        job.handle = Some(handle.clone());
        job.state = JobState::Submitted;

        let result = self
            .follow(&handle, policy, progress, Some(&mut job.state))
            .await;

        job.state = match &result {
            Ok(_) => JobState::Completed,
            Err(VideoError::Timeout { .. }) => JobState::TimedOut,
            Err(_) => JobState::Failed,
        };
        result
    }

    async fn download_with_retry(
        &self,
        artifact_ref: &ArtifactRef,
        policy: &PollPolicy,
        progress: Progress<'_>,
    ) -> Result<Artifact, VideoError> {
        let uri = &artifact_ref.uri;
        let mut retries: u32 = 0;

        loop {
            emit(progress, JobProgress::Downloading { uri: uri.clone() });

            let error = match self.backend.download(uri).await {
                Ok(bytes) if !bytes.is_empty() => {
                    debug!(bytes = bytes.len(), "video downloaded");
                    return Ok(Artifact {
                        uri: uri.clone(),
                        bytes,
                    });
                }
                Ok(_) => ApiError::Malformed("download returned an empty body".into()),
                Err(e) => e,
            };

            if error.is_transient() && retries < policy.max_download_retries {
                retries += 1;
                warn!(retries, "video download failed, retrying: {}", error);
                emit(
                    progress,
                    JobProgress::Retrying {
                        attempt: retries,
                        reason: error.to_string(),
                    },
                );
                sleep(policy.download_retry_delay).await;
                continue;
            }

            return Err(VideoError::Download {
                uri: uri.clone(),
                reason: error.to_string(),
                source: Some(error),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Mutex,
            atomic::{AtomicU32, Ordering},
        },
        time::Duration,
    };

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio::sync::mpsc;
    use tracing::level_filters::LevelFilter;

    use super::*;
    use crate::video::wire::Operation;

    fn setup_logging() {
        let _ = tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(LevelFilter::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn pending() -> Result<Operation, ApiError> {
        Ok(Operation {
            name: "operations/1".into(),
            ..Default::default()
        })
    }

    fn done(uri: &str) -> Result<Operation, ApiError> {
        Ok(serde_json::from_value(serde_json::json!({
            "name": "operations/1",
            "done": true,
            "response": {"generatedVideos": [{"video": {"uri": uri}}]}
        }))
        .unwrap())
    }

    fn unavailable() -> ApiError {
        ApiError::Api {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "try later".into(),
        }
    }

    #[derive(Default)]
    struct ScriptedBackend {
        reject_submit: bool,
        polls: Mutex<VecDeque<Result<Operation, ApiError>>>,
        downloads: Mutex<VecDeque<Result<Vec<u8>, ApiError>>>,
        submit_calls: AtomicU32,
        poll_calls: AtomicU32,
        download_calls: AtomicU32,
    }

    impl ScriptedBackend {
        fn with_polls(polls: Vec<Result<Operation, ApiError>>) -> Self {
            Self {
                polls: Mutex::new(polls.into()),
                ..Default::default()
            }
        }

        fn with_downloads(self, downloads: Vec<Result<Vec<u8>, ApiError>>) -> Self {
            *self.downloads.lock().unwrap() = downloads.into();
            self
        }
    }

    #[async_trait]
    impl VideoBackend for ScriptedBackend {
        async fn create_operation(&self, _request: &GenerationRequest) -> Result<String, ApiError> {
            self.submit_calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_submit {
                return Err(ApiError::Api {
                    status: StatusCode::FORBIDDEN,
                    body: "quota exceeded".into(),
                });
            }
            Ok("operations/1".into())
        }

        async fn fetch_operation(&self, _operation: &str) -> Result<Operation, ApiError> {
            self.poll_calls.fetch_add(1, Ordering::SeqCst);
            self.polls.lock().unwrap().pop_front().unwrap_or_else(pending)
        }

        async fn download(&self, _uri: &str) -> Result<Vec<u8>, ApiError> {
            self.download_calls.fetch_add(1, Ordering::SeqCst);
            self.downloads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(b"mp4-bytes".to_vec()))
        }
    }

    #[derive(Default)]
    struct StallingBackend {
        stall_polls: bool,
    }

    #[async_trait]
    impl VideoBackend for StallingBackend {
        async fn create_operation(&self, _request: &GenerationRequest) -> Result<String, ApiError> {
            Ok("operations/1".into())
        }

        async fn fetch_operation(&self, _operation: &str) -> Result<Operation, ApiError> {
            if self.stall_polls {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            done("https://x/v.mp4")
        }

        async fn download(&self, _uri: &str) -> Result<Vec<u8>, ApiError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(b"mp4-bytes".to_vec())
        }
    }

    fn image() -> ImageInput {
        ImageInput::new(vec![0x89, b'P', b'N', b'G'], "image/png")
    }

    fn fast_policy() -> PollPolicy {
        PollPolicy::fixed(Duration::from_secs(5)).with_timeout(Some(Duration::from_secs(60)))
    }

    #[tokio::test]
    async fn non_image_payload_fails_at_submit() {
        let client = VideoClient::new(ScriptedBackend::default());

        let err = client
            .submit(ImageInput::new(b"%PDF".to_vec(), "application/pdf"), "", AspectRatio::Landscape)
            .await
            .unwrap_err();

        assert!(matches!(err, VideoError::Submission { source: None, .. }));
        assert_eq!(client.backend.submit_calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.backend.poll_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn remote_rejection_is_a_submission_error() {
        let client = VideoClient::new(ScriptedBackend {
            reject_submit: true,
            ..Default::default()
        });

        let err = client
            .submit(image(), "neon lights", AspectRatio::Portrait)
            .await
            .unwrap_err();

        assert!(matches!(err, VideoError::Submission { source: Some(_), .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn poll_is_pending_until_done_then_stable() {
        let client = VideoClient::new(ScriptedBackend::with_polls(vec![
            pending(),
            pending(),
            done("https://x/v.mp4"),
            pending(),
        ]));
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();

        assert_eq!(client.poll(&handle).await.unwrap(), JobStatus::Pending);
        assert_eq!(client.poll(&handle).await.unwrap(), JobStatus::Pending);

        let terminal = client.poll(&handle).await.unwrap();
        assert!(matches!(terminal, JobStatus::Completed(_)));

        for _ in 0..3 {
            assert_eq!(client.poll(&handle).await.unwrap(), terminal);
        }
        assert_eq!(client.backend.poll_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn completes_and_downloads_artifact() {
        setup_logging();
        let client = VideoClient::new(ScriptedBackend::with_polls(vec![
            pending(),
            pending(),
            done("https://x/v.mp4"),
        ]));
        let handle = client.submit(image(), "make it fly", AspectRatio::Landscape).await.unwrap();

        let artifact = client.await_completion(&handle, &fast_policy()).await.unwrap();

        assert_eq!(artifact.uri, "https://x/v.mp4");
        assert_eq!(artifact.bytes, b"mp4-bytes");
        assert_eq!(client.backend.poll_calls.load(Ordering::SeqCst), 3);
        assert_eq!(handle.submitted_at.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn never_completing_job_times_out_within_bound() {
        setup_logging();
        let client = VideoClient::new(ScriptedBackend::default());
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();
        let policy = fast_policy();
        let started = Instant::now();

        let err = client.await_completion(&handle, &policy).await.unwrap_err();

        assert!(matches!(err, VideoError::Timeout { .. }));
        assert!(err.is_retryable());
        let bound = policy.timeout.unwrap() + policy.max_interval;
        assert!(started.elapsed() <= bound, "took {:?}", started.elapsed());
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_policy_still_respects_timeout() {
        let client = VideoClient::new(ScriptedBackend::default());
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();
        let policy = PollPolicy::default().with_timeout(Some(Duration::from_secs(45)));
        let started = Instant::now();

        let err = client.await_completion(&handle, &policy).await.unwrap_err();

        assert!(matches!(err, VideoError::Timeout { .. }));
        assert!(started.elapsed() <= Duration::from_secs(45) + policy.max_interval);
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_limit_stops_polling() {
        let client = VideoClient::new(ScriptedBackend::default());
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();
        let policy = fast_policy().with_timeout(None).with_max_attempts(Some(4));

        let err = client.await_completion(&handle, &policy).await.unwrap_err();

        assert!(matches!(err, VideoError::Timeout { attempts: 4, .. }));
        assert_eq!(client.backend.poll_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn remote_failure_is_not_retried() {
        let client = VideoClient::new(ScriptedBackend::with_polls(vec![
            pending(),
            Ok(serde_json::from_value(serde_json::json!({
                "done": true,
                "error": {"message": "image rejected by safety filters"}
            }))
            .unwrap()),
        ]));
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();

        let err = client.await_completion(&handle, &fast_policy()).await.unwrap_err();

        match err {
            VideoError::JobFailed { cause, .. } => {
                assert_eq!(cause, "image rejected by safety filters")
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
        assert_eq!(client.backend.download_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_poll_errors_are_retried() {
        let client = VideoClient::new(ScriptedBackend::with_polls(vec![
            Err(unavailable()),
            Err(unavailable()),
            Err(unavailable()),
            done("https://x/v.mp4"),
        ]));
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();

        let artifact = client.await_completion(&handle, &fast_policy()).await.unwrap();
        assert_eq!(artifact.bytes, b"mp4-bytes");
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_poll_errors_escalate() {
        let client = VideoClient::new(ScriptedBackend::with_polls(vec![
            Err(unavailable()),
            Err(unavailable()),
            Err(unavailable()),
            Err(unavailable()),
            done("https://x/v.mp4"),
        ]));
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();

        let err = client.await_completion(&handle, &fast_policy()).await.unwrap_err();

        assert!(matches!(err, VideoError::Polling { .. }));
        assert_eq!(client.backend.poll_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_poll_error_escalates_immediately() {
        let client = VideoClient::new(ScriptedBackend::with_polls(vec![Err(ApiError::Api {
            status: StatusCode::NOT_FOUND,
            body: "no such operation".into(),
        })]));
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();

        let err = client.await_completion(&handle, &fast_policy()).await.unwrap_err();

        assert!(matches!(err, VideoError::Polling { .. }));
        assert_eq!(client.backend.poll_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn download_is_retried_then_succeeds() {
        let backend = ScriptedBackend::with_polls(vec![done("https://x/v.mp4")])
            .with_downloads(vec![Err(unavailable()), Ok(b"video".to_vec())]);
        let client = VideoClient::new(backend);
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();

        let artifact = client.await_completion(&handle, &fast_policy()).await.unwrap();

        assert_eq!(artifact.bytes, b"video");
        assert_eq!(client.backend.download_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn download_failure_is_distinct_from_job_failure() {
        let backend = ScriptedBackend::with_polls(vec![done("https://x/v.mp4")]).with_downloads(
            vec![Err(unavailable()), Err(unavailable()), Err(unavailable()), Err(unavailable())],
        );
        let client = VideoClient::new(backend);
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();

        let err = client.await_completion(&handle, &fast_policy()).await.unwrap_err();

        assert!(matches!(err, VideoError::Download { .. }));
        assert_eq!(err.user_message(), "Failed to download generated video.");
        assert_eq!(client.backend.download_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_download_is_not_a_success() {
        let backend =
            ScriptedBackend::with_polls(vec![done("https://x/v.mp4")]).with_downloads(vec![Ok(Vec::new())]);
        let client = VideoClient::new(backend);
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();

        let err = client.await_completion(&handle, &fast_policy()).await.unwrap_err();
        assert!(matches!(err, VideoError::Download { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn generate_tracks_job_state_and_reports_progress() {
        let client = VideoClient::new(ScriptedBackend::with_polls(vec![
            pending(),
            done("https://x/v.mp4"),
        ]));
        let request = GenerationRequest::new(image(), "drift", AspectRatio::Portrait);
        let mut job = GenerationJob::new(request);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let artifact = client.generate(&mut job, &fast_policy(), Some(&tx)).await.unwrap();
        drop(tx);

        assert_eq!(artifact.bytes, b"mp4-bytes");
        assert_eq!(job.state, JobState::Completed);
        assert!(job.handle.is_some());

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert!(matches!(events.first(), Some(JobProgress::Submitted { .. })));
        assert!(matches!(events[1], JobProgress::Pending { attempt: 1, .. }));
        assert!(matches!(events.last(), Some(JobProgress::Completed { bytes: 9 })));
    }

    #[tokio::test(start_paused = true)]
    async fn generate_marks_timeout() {
        let client = VideoClient::new(ScriptedBackend::default());
        let mut job = GenerationJob::new(GenerationRequest::new(image(), "", AspectRatio::Landscape));

        let result = client.generate(&mut job, &fast_policy(), None).await;

        assert!(result.is_err());
        assert_eq!(job.state, JobState::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_wait_stops_polling() {
        let client = VideoClient::new(ScriptedBackend::default());
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();
        let policy = PollPolicy::fixed(Duration::from_secs(5)).with_timeout(None);

        let outcome = tokio::time::timeout(
            Duration::from_secs(12),
            client.await_completion(&handle, &policy),
        )
        .await;
        assert!(outcome.is_err());

        let polls = client.backend.poll_calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(client.backend.poll_calls.load(Ordering::SeqCst), polls);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_status_request_still_times_out() {
        setup_logging();
        let client = VideoClient::new(StallingBackend { stall_polls: true });
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();
        let start = tokio::time::Instant::now();

        let err = client.await_completion(&handle, &fast_policy()).await.unwrap_err();

        assert!(matches!(err, VideoError::Timeout { attempts: 1, .. }));
        assert!(start.elapsed() <= Duration::from_secs(65), "{:?}", start.elapsed());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_download_still_times_out() {
        let client = VideoClient::new(StallingBackend::default());
        let handle = client.submit(image(), "", AspectRatio::Landscape).await.unwrap();
        let start = tokio::time::Instant::now();

        let err = client.await_completion(&handle, &fast_policy()).await.unwrap_err();

        assert!(matches!(err, VideoError::Timeout { .. }));
        assert!(start.elapsed() <= Duration::from_secs(65), "{:?}", start.elapsed());
    }

    #[tokio::test(start_paused = true)]
    async fn job_is_pending_once_the_remote_answers() {
        let client = VideoClient::new(ScriptedBackend::default());
        let mut job = GenerationJob::new(GenerationRequest::new(image(), "", AspectRatio::Landscape));

        let outcome = tokio::time::timeout(
            Duration::from_secs(1),
            client.generate(&mut job, &fast_policy(), None),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(job.state, JobState::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn job_stays_submitted_until_first_status() {
        let client = VideoClient::new(StallingBackend { stall_polls: true });
        let mut job = GenerationJob::new(GenerationRequest::new(image(), "", AspectRatio::Landscape));

        let outcome = tokio::time::timeout(
            Duration::from_secs(1),
            client.generate(&mut job, &fast_policy(), None),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(job.state, JobState::Submitted);
        assert!(job.handle.is_some());
    }
}
