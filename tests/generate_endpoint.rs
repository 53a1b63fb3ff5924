use std::sync::Arc;
use std::time::Duration;

use podscript::app::{App, run_effect};
use podscript::config::generate_url;
use podscript::errors::GenerateError;
use podscript::headless::run_generate;
use podscript::podcast_request::GeneratePodcastRequest;
use podscript::script_generator::{HttpScriptGenerator, ScriptGenerator};
use serde_json::json;
use tokio::sync::mpsc::unbounded_channel;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn generator_for(server: &MockServer) -> HttpScriptGenerator {
    let endpoint = generate_url(&server.uri()).expect("mock server uri");
    HttpScriptGenerator::new(endpoint, None).expect("http client")
}

#[tokio::test]
async fn generator_posts_form_fields_and_returns_script() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_podcast"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "topic": "量子コンピュータ",
            "num_articles": 3,
            "listener_message": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "script": "こんにちは" })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    let request = GeneratePodcastRequest::new("量子コンピュータ", Some(3), "");

    let script = generator.generate(&request).await.expect("generate ok");
    assert_eq!(script, "こんにちは");
}

#[tokio::test]
async fn headless_generate_prints_script_from_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_podcast"))
        .and(body_json(json!({
            "topic": "AI",
            "num_articles": 2,
            "listener_message": "よろしく"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "script": "Intro\n  Body" })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    let endpoint = generator.endpoint().to_string();
    let request = GeneratePodcastRequest::new("AI", Some(2), "よろしく");
    let mut out: Vec<u8> = Vec::new();

    run_generate(&generator, &request, &endpoint, &mut out).await.expect("generate ok");
    assert_eq!(String::from_utf8(out).unwrap(), "Intro\n  Body\n");
}

#[tokio::test]
async fn round_trip_displays_script_with_whitespace_intact() {
    let script = "番組の開始と挨拶\n\n  1. 記事の要約\n\t2. リスナーからのお便り\n\n";
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_podcast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "script": script })))
        .expect(1)
        .mount(&server)
        .await;

    let generator: Arc<dyn ScriptGenerator> = Arc::new(generator_for(&server));
    let (event_tx, mut event_rx) = unbounded_channel();
    let mut app = App::new();
    app.form.set_topic("量子コンピュータ");
    app.form.set_article_count(Some(3));
    app.form.set_listener_message("");

    let effect = app.submit().expect("submit enabled");
    assert!(app.form.is_loading());
    assert!(app.submit().is_none());

    run_effect(effect, generator, event_tx);
    let event = tokio::time::timeout(Duration::from_secs(5), event_rx.recv())
        .await
        .expect("response in time")
        .expect("event");
    app.handle_event(event);

    assert_eq!(app.form.script(), Some(script));
    assert!(!app.form.is_loading());
    assert!(app.alert.is_none());
}

#[tokio::test]
async fn article_count_bounds_and_null_are_sent_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_podcast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "script": "ok" })))
        .expect(4)
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    for count in [Some(1), Some(5), Some(9), None] {
        let request = GeneratePodcastRequest::new("AI", count, "");
        assert_eq!(generator.generate(&request).await.expect("generate ok"), "ok");
    }

    let bodies: Vec<serde_json::Value> = server
        .received_requests()
        .await
        .expect("recording enabled")
        .iter()
        .map(|r| serde_json::from_slice(&r.body).expect("json body"))
        .collect();
    let counts: Vec<serde_json::Value> = bodies.iter().map(|b| b["num_articles"].clone()).collect();
    assert_eq!(counts, vec![json!(1), json!(5), json!(9), json!(null)]);
}

#[tokio::test]
async fn generator_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_podcast"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "llm down" })))
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    let request = GeneratePodcastRequest::new("AI", Some(3), "");

    let err = generator.generate(&request).await.unwrap_err();
    assert!(matches!(err, GenerateError::HttpStatus(500)));
}

#[tokio::test]
async fn generator_fails_on_body_without_script() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_podcast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "wrong field" })))
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    let request = GeneratePodcastRequest::new("AI", Some(3), "");

    let err = generator.generate(&request).await.unwrap_err();
    assert!(matches!(err, GenerateError::MalformedResponse(_)));
}

#[tokio::test]
async fn failed_request_keeps_previous_script_on_screen() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_podcast"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let generator: Arc<dyn ScriptGenerator> = Arc::new(generator_for(&server));
    let (event_tx, mut event_rx) = unbounded_channel();
    let mut app = App::new();
    app.submit().expect("submit enabled");
    app.handle_event(podscript::event::AppEvent::ScriptGenerated(Ok("earlier".to_string())));

    let effect = app.submit().expect("submit enabled");
    run_effect(effect, generator, event_tx);
    app.handle_event(event_rx.recv().await.expect("event"));

    assert_eq!(app.form.script(), Some("earlier"));
    assert!(app.alert.is_some());
    assert!(!app.form.is_loading());
}

#[tokio::test]
async fn generator_times_out_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_podcast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "script": "late" })),
        )
        .mount(&server)
        .await;

    let endpoint = generate_url(&server.uri()).expect("mock server uri");
    let generator = HttpScriptGenerator::new(endpoint, Some(Duration::from_millis(50))).unwrap();
    let request = GeneratePodcastRequest::new("AI", Some(3), "");

    let err = generator.generate(&request).await.unwrap_err();
    assert!(matches!(err, GenerateError::Network(ref e) if e.is_timeout()));
}
