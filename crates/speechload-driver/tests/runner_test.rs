// End-to-end driver tests against a mock speech-synthesis endpoint.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use speechload_core::TextLength;
use speechload_driver::{run, RunConfig};

const MP3_BYTES: &[u8] = &[0xff, 0xf3, 0x44, 0x00, 0x12, 0x34, 0x56, 0x78];

fn audio_response() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Content-Type", "audio/mpeg")
        .set_body_bytes(MP3_BYTES.to_vec())
}

fn config(server: &MockServer) -> RunConfig {
    RunConfig {
        base_url: server.uri(),
        text_length: TextLength::Short,
        ..RunConfig::default()
    }
}

#[tokio::test]
async fn fixed_count_run_completes_and_aggregates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(audio_response())
        .expect(4)
        .mount(&server)
        .await;

    let summary = run(RunConfig {
        num_requests: Some(4),
        concurrency: 2,
        ..config(&server)
    })
    .await
    .unwrap();

    assert_eq!(summary.total_requests, 4);
    assert_eq!(summary.successful_requests, 4);
    assert_eq!(summary.failed_requests, 0);
    assert_eq!(summary.success_rate, 100.0);
    assert_eq!(summary.total_bytes, 4 * MP3_BYTES.len() as u64);
    assert!(summary.failures.is_empty());
    assert!(summary.durations.is_some());
}

#[tokio::test]
async fn request_carries_credential_and_fixed_payload_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(header("Authorization", "Bearer dummy-api-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "input": TextLength::Short.sample_text(),
            "model": "tts-1",
            "voice": "alloy",
            "speed": 1.0,
        })))
        .respond_with(audio_response())
        .expect(1)
        .mount(&server)
        .await;

    let summary = run(RunConfig {
        num_requests: Some(1),
        ..config(&server)
    })
    .await
    .unwrap();

    assert_eq!(summary.successful_requests, 1);
}

#[tokio::test]
async fn failure_stops_the_run_at_its_batch_boundary() {
    let server = MockServer::start().await;

    // Sequence 5 maps to the "echo" voice; every other request in the
    // first two batches uses a different voice, so only request 5
    // fails. Mocks match in mount order.
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_partial_json(json!({ "voice": "echo" })))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(audio_response())
        .expect(5)
        .mount(&server)
        .await;

    let summary = run(RunConfig {
        num_requests: Some(10),
        concurrency: 3,
        ..config(&server)
    })
    .await
    .unwrap();

    // Batches [1-3] and [4-6] resolve; requests 7-10 are never issued.
    assert_eq!(summary.total_requests, 6);
    assert_eq!(summary.successful_requests, 5);
    assert_eq!(summary.failed_requests, 1);

    let failure = &summary.failures[0];
    assert_eq!(failure.sequence, 5);
    assert_eq!(failure.reason, "HTTP 500");
}

#[tokio::test]
async fn continuous_mode_halts_after_the_failing_batch() {
    let server = MockServer::start().await;

    // Sequence 3 maps to "ballad"; with concurrency 1 the run halts
    // immediately after the third request.
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_partial_json(json!({ "voice": "ballad" })))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(audio_response())
        .expect(2)
        .mount(&server)
        .await;

    let summary = run(RunConfig {
        num_requests: None,
        concurrency: 1,
        ..config(&server)
    })
    .await
    .unwrap();

    assert_eq!(summary.total_requests, 3);
    assert_eq!(summary.successful_requests, 2);
    assert_eq!(summary.failures[0].sequence, 3);
}

#[tokio::test]
async fn empty_body_counts_as_failure_even_with_status_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let summary = run(RunConfig {
        num_requests: Some(1),
        ..config(&server)
    })
    .await
    .unwrap();

    assert_eq!(summary.total_requests, 1);
    assert_eq!(summary.successful_requests, 0);
    assert_eq!(summary.failures[0].reason, "HTTP 200");
}

#[tokio::test]
async fn transport_error_becomes_a_failed_record() {
    // Nothing listens here; the connection itself fails.
    let summary = run(RunConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        num_requests: Some(1),
        ..RunConfig::default()
    })
    .await
    .unwrap();

    assert_eq!(summary.total_requests, 1);
    assert_eq!(summary.failed_requests, 1);
    assert_eq!(summary.success_rate, 0.0);

    let failure = &summary.failures[0];
    assert_eq!(failure.sequence, 1);
    // A transport failure carries the error text, not an HTTP status.
    assert!(!failure.reason.starts_with("HTTP "));
    assert!(!failure.reason.is_empty());
}

#[tokio::test]
async fn zero_request_run_reports_without_dispatching() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(audio_response())
        .expect(0)
        .mount(&server)
        .await;

    let summary = run(RunConfig {
        num_requests: Some(0),
        ..config(&server)
    })
    .await
    .unwrap();

    assert_eq!(summary.total_requests, 0);
    assert_eq!(summary.success_rate, 0.0);
}

#[tokio::test]
async fn save_audio_writes_one_file_per_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(audio_response())
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let summary = run(RunConfig {
        num_requests: Some(2),
        save_audio: true,
        output_dir: tmp.path().to_path_buf(),
        ..config(&server)
    })
    .await
    .unwrap();

    assert_eq!(summary.successful_requests, 2);

    let first = tmp.path().join("test_1_alloy.mp3");
    let second = tmp.path().join("test_2_ash.mp3");
    assert_eq!(std::fs::read(&first).unwrap(), MP3_BYTES);
    assert_eq!(std::fs::read(&second).unwrap(), MP3_BYTES);
}

#[tokio::test]
async fn save_disabled_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(audio_response())
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let summary = run(RunConfig {
        num_requests: Some(2),
        save_audio: false,
        output_dir: tmp.path().to_path_buf(),
        ..config(&server)
    })
    .await
    .unwrap();

    assert_eq!(summary.successful_requests, 2);
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}
