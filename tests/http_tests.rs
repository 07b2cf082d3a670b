//! Router integration tests
//!
//! Requests go through the real router, use case and scratch store; only the
//! model clients are replaced with in-process fakes.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use chonaikai_minutes::api::{build_router, AppState};
use chonaikai_minutes::application::ports::{
    CompletionError, Summarizer, TextRefiner, Transcriber, TranscriptionError,
};
use chonaikai_minutes::application::{GenerateMinutesUseCase, PipelineSettings};
use chonaikai_minutes::domain::audio::{AudioMimeType, AudioUpload};
use chonaikai_minutes::domain::minutes::{LanguageHint, RefinedText, SummaryText, Transcript};
use chonaikai_minutes::infrastructure::ScratchDirStore;

const BOUNDARY: &str = "minutes-test-boundary";
const UPLOAD_URI: &str = "/whisper/process-audio/";

#[derive(Default)]
struct Calls {
    transcribe: AtomicUsize,
    refine: AtomicUsize,
    summarize: AtomicUsize,
    /// Path and contents of the scratch file as the transcriber saw it
    seen: Mutex<Option<(PathBuf, Vec<u8>)>>,
}

struct FakeTranscriber {
    text: &'static str,
    calls: Arc<Calls>,
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(
        &self,
        audio: &Path,
        _language: &LanguageHint,
    ) -> Result<Transcript, TranscriptionError> {
        self.calls.transcribe.fetch_add(1, Ordering::SeqCst);
        let bytes = std::fs::read(audio).map_err(|e| TranscriptionError::ReadFailed(e.to_string()))?;
        *self.calls.seen.lock().unwrap() = Some((audio.to_path_buf(), bytes));
        Ok(Transcript::new(self.text))
    }
}

struct FakeRefiner {
    fail: bool,
    /// Fixed reply; otherwise the transcript is echoed with a marker
    reply: Option<&'static str>,
    calls: Arc<Calls>,
}

#[async_trait]
impl TextRefiner for FakeRefiner {
    async fn refine(&self, transcript: &Transcript) -> Result<RefinedText, CompletionError> {
        self.calls.refine.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CompletionError::RequestFailed("upstream reset".to_string()));
        }
        match self.reply {
            Some(reply) => Ok(RefinedText::new(reply)),
            None => Ok(RefinedText::new(format!("整えた: {}", transcript.text()))),
        }
    }
}

struct FakeSummarizer {
    reply: Option<&'static str>,
    calls: Arc<Calls>,
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, text: &RefinedText) -> Result<SummaryText, CompletionError> {
        self.calls.summarize.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Some(reply) => Ok(SummaryText::new(reply)),
            None => Ok(SummaryText::new(format!("- {}", text.text()))),
        }
    }
}

struct Harness {
    router: Router,
    scratch: TempDir,
    calls: Arc<Calls>,
}

impl Harness {
    fn scratch_dir(&self) -> PathBuf {
        self.scratch.path().join("audio")
    }

    fn leftover_files(&self) -> usize {
        std::fs::read_dir(self.scratch_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// What the fake model clients answer with
#[derive(Clone, Copy, Default)]
struct Replies {
    transcript: &'static str,
    refined: Option<&'static str>,
    summary: Option<&'static str>,
    refine_fails: bool,
}

type FakeUseCase = GenerateMinutesUseCase<ScratchDirStore, FakeTranscriber, FakeRefiner, FakeSummarizer>;

fn fake_use_case(store: ScratchDirStore, replies: Replies, calls: &Arc<Calls>) -> FakeUseCase {
    GenerateMinutesUseCase::new(
        store,
        Some(FakeTranscriber {
            text: replies.transcript,
            calls: Arc::clone(calls),
        }),
        Some(FakeRefiner {
            fail: replies.refine_fails,
            reply: replies.refined,
            calls: Arc::clone(calls),
        }),
        Some(FakeSummarizer {
            reply: replies.summary,
            calls: Arc::clone(calls),
        }),
        PipelineSettings::default(),
    )
}

fn harness_replying(replies: Replies, ready: bool, max_upload: usize) -> Harness {
    let scratch = TempDir::new().unwrap();
    let calls = Arc::new(Calls::default());
    let store = ScratchDirStore::new(scratch.path().join("audio"));

    let use_case = if ready {
        fake_use_case(store, replies, &calls)
    } else {
        GenerateMinutesUseCase::new(store, None, None, None, PipelineSettings::default())
    };

    let state = AppState::new(Arc::new(use_case), max_upload);
    Harness {
        router: build_router(state),
        scratch,
        calls,
    }
}

fn harness_with(transcript: &'static str, refine_fails: bool, ready: bool, max_upload: usize) -> Harness {
    let replies = Replies {
        transcript,
        refine_fails,
        ..Replies::default()
    };
    harness_replying(replies, ready, max_upload)
}

fn harness(transcript: &'static str) -> Harness {
    harness_with(transcript, false, true, 1024 * 1024)
}

fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send_raw(router: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn upload_returns_full_text_and_summary() {
    let h = harness("今日の会議");
    let body = multipart_body("audio_file", "meeting.m4a", "audio/mp4", b"AUDIO");

    let (status, json) = send(h.router.clone(), upload_request(UPLOAD_URI, body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "full_text": "整えた: 今日の会議",
            "summary": "- 整えた: 今日の会議",
        })
    );
    assert_eq!(h.calls.transcribe.load(Ordering::SeqCst), 1);
    assert_eq!(h.calls.refine.load(Ordering::SeqCst), 1);
    assert_eq!(h.calls.summarize.load(Ordering::SeqCst), 1);
    assert_eq!(h.leftover_files(), 0);
}

#[tokio::test]
async fn greeting_upload_returns_exact_body() {
    let replies = Replies {
        transcript: "こんにちは",
        refined: Some("こんにちは。"),
        summary: Some("- 挨拶"),
        refine_fails: false,
    };
    let h = harness_replying(replies, true, 1024 * 1024);
    let body = multipart_body("audio_file", "greeting.m4a", "audio/mp4", b"AUDIO");

    let (status, body) = send_raw(h.router.clone(), upload_request(UPLOAD_URI, body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"full_text":"こんにちは。","summary":"- 挨拶"}"#);
    assert_eq!(h.leftover_files(), 0);
}

#[tokio::test]
async fn abandoned_request_leaves_no_scratch_file() {
    let scratch = TempDir::new().unwrap();
    let dir = scratch.path().join("audio");
    let calls = Arc::new(Calls::default());
    let replies = Replies {
        transcript: "会議",
        ..Replies::default()
    };
    let use_case = fake_use_case(ScratchDirStore::new(&dir), replies, &calls);
    let upload = AudioUpload::new(vec![0u8; 200 * 1024 * 1024], AudioMimeType::M4a);
    let token = CancellationToken::new();

    let _ = tokio::time::timeout(Duration::from_millis(1), use_case.execute(upload, &token)).await;

    let mut leftover = usize::MAX;
    for _ in 0..100 {
        leftover = std::fs::read_dir(&dir).map(|d| d.count()).unwrap_or(0);
        if leftover == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(leftover, 0);
}

#[tokio::test]
async fn transcriber_reads_uploaded_bytes_from_scratch_dir() {
    let h = harness("テスト");
    let body = multipart_body("audio_file", "memo.wav", "audio/wav", b"RIFF-bytes");

    let (status, _) = send(h.router.clone(), upload_request(UPLOAD_URI, body)).await;
    assert_eq!(status, StatusCode::OK);

    let (path, bytes) = h.calls.seen.lock().unwrap().clone().unwrap();
    assert_eq!(bytes, b"RIFF-bytes");
    assert_eq!(path.parent(), Some(h.scratch_dir().as_path()));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));
    assert!(!path.exists());
}

#[tokio::test]
async fn unknown_content_type_falls_back_to_m4a() {
    let h = harness("テスト");
    let body = multipart_body("audio_file", "blob", "application/octet-stream", b"x");

    let (status, _) = send(h.router.clone(), upload_request(UPLOAD_URI, body)).await;
    assert_eq!(status, StatusCode::OK);

    let (path, _) = h.calls.seen.lock().unwrap().clone().unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("m4a"));
}

#[tokio::test]
async fn path_without_trailing_slash_is_accepted() {
    let h = harness("会議");
    let body = multipart_body("audio_file", "a.m4a", "audio/mp4", b"x");

    let (status, _) = send(
        h.router.clone(),
        upload_request("/whisper/process-audio", body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn blank_transcript_is_bad_request() {
    let h = harness("  ");
    let body = multipart_body("audio_file", "silence.m4a", "audio/mp4", b"x");

    let (status, json) = send(h.router.clone(), upload_request(UPLOAD_URI, body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "音声からテキストを抽出出来ませんでした。");
    assert_eq!(h.calls.refine.load(Ordering::SeqCst), 0);
    assert_eq!(h.calls.summarize.load(Ordering::SeqCst), 0);
    assert_eq!(h.leftover_files(), 0);
}

#[tokio::test]
async fn refinement_failure_is_internal_error() {
    let h = harness_with("会議", true, true, 1024 * 1024);
    let body = multipart_body("audio_file", "a.m4a", "audio/mp4", b"x");

    let (status, json) = send(h.router.clone(), upload_request(UPLOAD_URI, body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("処理中にエラーが発生しました："));
    assert!(detail.contains("upstream reset"));
    assert_eq!(h.calls.summarize.load(Ordering::SeqCst), 0);
    assert_eq!(h.leftover_files(), 0);
}

#[tokio::test]
async fn unconfigured_service_reports_unavailable() {
    let h = harness_with("", false, false, 1024 * 1024);
    let body = multipart_body("audio_file", "a.m4a", "audio/mp4", b"x");

    let (status, json) = send(h.router.clone(), upload_request(UPLOAD_URI, body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["detail"], "サーバーのAIモデルが正しく設定されていません。");
    assert!(!h.scratch_dir().exists());
}

#[tokio::test]
async fn missing_audio_field_is_unprocessable() {
    let h = harness("会議");
    let body = multipart_body("file", "a.m4a", "audio/mp4", b"x");

    let (status, json) = send(h.router.clone(), upload_request(UPLOAD_URI, body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("audio_file"));
    assert_eq!(h.calls.transcribe.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let h = harness_with("会議", false, true, 64);
    let body = multipart_body("audio_file", "a.m4a", "audio/mp4", &[0u8; 4096]);

    let (status, _) = send(h.router.clone(), upload_request(UPLOAD_URI, body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(h.calls.transcribe.load(Ordering::SeqCst), 0);
    assert_eq!(h.leftover_files(), 0);
}

#[tokio::test]
async fn health_reports_readiness() {
    let ready = harness("会議");
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, json) = send(ready.router.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["services_ready"], true);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));

    let degraded = harness_with("", false, false, 1024);
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (_, json) = send(degraded.router.clone(), request).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["services_ready"], false);
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let h = harness("会議");
    let request = Request::get("/").body(Body::empty()).unwrap();

    let (status, json) = send(h.router.clone(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "message": "町内会APIへようこそ！" }));
}
