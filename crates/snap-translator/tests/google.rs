use std::sync::Arc;

use snap_translator::{GoogleTranslator, NETWORK_ERROR_MESSAGE, TextTranslator, TranslateError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one canned HTTP response, returning the endpoint URL and the request line
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/translate_a/single", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let n = socket.read(&mut buf).await.unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        request.lines().next().unwrap_or_default().to_string()
    });

    (url, handle)
}

const LIVE_URL: &str = "https://translate.googleapis.com/translate_a/single";

fn translator(url: String) -> TextTranslator {
    // keep loopback requests away from any proxy configured in the environment
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    TextTranslator::new(Arc::new(GoogleTranslator::with_client(client, url)))
}

#[tokio::test]
async fn test_unreachable_provider_gives_network_message() {
    let translator = translator("http://127.0.0.1:1/translate_a/single".to_string());

    assert_eq!(
        translator.translate_or_empty("Hello", None, "es").await,
        NETWORK_ERROR_MESSAGE
    );

    let err = translator
        .translate_or_throw("Hello", None, "es")
        .await
        .unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn test_bad_api_url_is_not_reported_as_network() {
    let translator = translator("not a url".to_string());

    let err = translator
        .translate_or_throw("Hello", None, "es")
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::NetworkError(_)));
    assert!(!err.is_network());

    let text = translator.translate_or_empty("Hello", None, "es").await;
    assert!(text.starts_with("Translation error:"), "{text}");
    assert_ne!(text, NETWORK_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_successful_round_trip() {
    let (url, request) = serve_once(
        "200 OK",
        r#"[[["Hola","Hello",null,null,10]],null,"en",null,null,null,0.98]"#,
    )
    .await;

    let result = translator(url)
        .translate_or_throw("Hello", None, "ES")
        .await
        .unwrap();
    assert_eq!(result.text, "Hola");
    assert_eq!(result.source_language, "en");
    assert_eq!(result.destination_language, "es");

    let request_line = request.await.unwrap();
    assert!(request_line.starts_with("GET /translate_a/single?"));
    assert!(request_line.contains("client=gtx"));
    assert!(request_line.contains("sl=auto"));
    assert!(request_line.contains("tl=es"));
}

#[tokio::test]
async fn test_rate_limit_status() {
    let (url, _request) = serve_once("429 Too Many Requests", "").await;

    assert!(matches!(
        translator(url).translate_or_throw("Hello", Some("en"), "es").await,
        Err(TranslateError::RateLimitExceeded)
    ));
}

#[tokio::test]
async fn test_server_error_is_generic_message() {
    let (url, _request) = serve_once("500 Internal Server Error", "").await;

    let text = translator(url).translate_or_empty("Hello", Some("en"), "es").await;
    assert!(text.starts_with("Translation error:"));
    assert!(text.contains("500"));
}

#[tokio::test]
async fn test_malformed_body_is_api_error() {
    let (url, _request) = serve_once("200 OK", r#"{"unexpected": true}"#).await;

    assert!(matches!(
        translator(url).translate_or_throw("Hello", Some("en"), "es").await,
        Err(TranslateError::ApiError(_))
    ));
}

#[tokio::test]
#[ignore = "needs network"]
async fn test_live_translate_to_spanish() {
    let translator = translator(LIVE_URL.to_string());
    let result = translator.translate_or_throw("Hello", None, "es").await.unwrap();
    assert_eq!(result.destination_language, "es");
    assert!(!result.text.trim().is_empty());
}

#[tokio::test]
#[ignore = "needs network"]
async fn test_live_detect_spanish() {
    let translator = translator(LIVE_URL.to_string());
    assert!(translator.detect_language("").await.is_err());

    let detection = translator.detect_language("Hola").await.unwrap();
    assert_eq!(detection.language, "es");
    assert!(detection.confidence > 0.5);
}
