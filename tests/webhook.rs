use std::{
    io::{BufRead, BufReader, Read, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
};

use discord_webhook::{
    ERROR_PREFIX, EmbedBuilder, Error, HttpTransport, Message, WebhookClient,
    webhook::describe,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

/// A request as seen by [`serve_once`].
struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Accepts a single connection, answers it with `status` and `body`, and hands back the request.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!(
        "http://{}/api/webhooks/123/token",
        listener.local_addr().unwrap()
    );

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            let (key, value) = line.split_once(':').unwrap();
            headers.push((key.trim().to_owned(), value.trim().to_owned()));
        }

        let length = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
            .map_or(0, |(_, value)| value.parse::<usize>().unwrap());
        let mut buf = vec![0; length];
        reader.read_exact(&mut buf).unwrap();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        reader.get_mut().write_all(response.as_bytes()).unwrap();
        reader.get_mut().flush().unwrap();

        Captured {
            request_line: request_line.trim_end().to_owned(),
            headers,
            body: String::from_utf8(buf).unwrap(),
        }
    });

    (url, handle)
}

/// Port 9 on localhost refuses connections on any sane test machine.
const UNREACHABLE: &str = "http://127.0.0.1:9/api/webhooks/123/token";

#[test]
fn test_plain_message_request() {
    let (url, server) = serve_once("204 No Content", "");
    let client = WebhookClient::new(&url)
        .unwrap()
        .with_username("Notifier")
        .with_avatar_url("https://example.com/avatar.png");

    let body = client.send_message("Hello there", false);
    let request = server.join().unwrap();

    assert_eq!(body, "");
    assert_eq!(request.request_line, "POST /api/webhooks/123/token HTTP/1.1");
    assert_eq!(
        request.header("content-type"),
        Some("application/json; charset=utf-8")
    );
    assert_eq!(
        request.json(),
        json!({
            "username": "Notifier",
            "avatar_url": "https://example.com/avatar.png",
            "content": "Hello there",
            "tts": false,
        })
    );
}

#[test]
fn test_single_embed_request() {
    let (url, server) = serve_once("200 OK", r#"{"id":"1"}"#);
    let client = WebhookClient::new(&url).unwrap();
    let embed = EmbedBuilder::new()
        .set_title("Release")
        .set_color("#FF0000")
        .add_field("Version", "1.2.0", true)
        .add_field("Channel", "stable", false)
        .build();

    let body = client.send_embed(&embed, Some("New release!"), true);
    let request = server.join().unwrap();

    assert_eq!(body, r#"{"id":"1"}"#);
    let sent = request.json();
    assert_eq!(sent["content"], json!("New release!"));
    assert_eq!(sent["tts"], json!(true));
    assert!(sent.get("username").is_none());
    assert_eq!(
        sent["embeds"],
        json!([{
            "title": "Release",
            "color": 16_711_680,
            "fields": [
                { "name": "Version", "value": "1.2.0", "inline": true },
                { "name": "Channel", "value": "stable", "inline": false },
            ],
        }])
    );
}

#[test]
fn test_remote_rejection_is_returned_as_body() {
    let rejection = r#"{"message": "Cannot send an empty message", "code": 50006}"#;
    let (url, server) = serve_once("400 Bad Request", rejection);
    let client = WebhookClient::new(&url).unwrap();

    let response = client.execute(&Message::text("", false)).unwrap();
    server.join().unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.is_success());
    assert_eq!(response.body, rejection);
    assert_eq!(describe(Ok(response)), rejection);
}

#[test]
fn test_unreachable_host_blocking() {
    let client = WebhookClient::new(UNREACHABLE).unwrap();
    let embed = EmbedBuilder::new().set_title("lost").build();

    for body in [
        client.send_message("hello", false),
        client.send_embed(&embed, None, false),
        client.send_embeds([&embed, &embed], Some("two"), false),
    ] {
        assert!(body.starts_with(ERROR_PREFIX), "{body}");
        assert!(body.starts_with("Error when request discord webhook url. Error Message:"));
        assert!(!body.contains("/api/webhooks/123/"), "token leaked: {body}");
    }

    let err = client.execute(&Message::text("hello", false)).unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[test]
fn test_custom_transport() {
    let (url, server) = serve_once("200 OK", "ok");
    let transport = HttpTransport::from_client(reqwest::Client::new());
    let client = WebhookClient::new(&url).unwrap().with_transport(transport);

    assert_eq!(client.send_message("via custom transport", false), "ok");
    assert_eq!(server.join().unwrap().json()["content"], json!("via custom transport"));
}

#[tokio::test]
async fn test_embeds_async() {
    let (url, server) = serve_once("200 OK", "async ok");
    let client = WebhookClient::new(&url).unwrap().with_username("Async");
    let first = EmbedBuilder::new().set_title("first").build();
    let second = EmbedBuilder::new()
        .set_title("second")
        .set_color_rgb(0, 0, 255)
        .build();

    let body = client
        .send_embeds_async([&first, &second], None, false)
        .await;
    let request = tokio::task::spawn_blocking(move || server.join().unwrap())
        .await
        .unwrap();

    assert_eq!(body, "async ok");
    let sent = request.json();
    assert_eq!(sent["username"], json!("Async"));
    assert!(sent.get("content").is_none());
    assert_eq!(sent["embeds"][0]["title"], json!("first"));
    assert_eq!(sent["embeds"][1]["color"], json!(255));
}

#[tokio::test]
async fn test_message_async() {
    let (url, server) = serve_once("204 No Content", "");
    let client = WebhookClient::new(&url).unwrap();

    let body = client.send_message_async("speak", true).await;
    let request = tokio::task::spawn_blocking(move || server.join().unwrap())
        .await
        .unwrap();

    assert_eq!(body, "");
    assert_eq!(request.json(), json!({ "content": "speak", "tts": true }));
}

#[tokio::test]
async fn test_unreachable_host_async() {
    let client = WebhookClient::new(UNREACHABLE).unwrap();
    let embed = EmbedBuilder::new().set_description("lost").build();

    let body = client.send_message_async("hello", false).await;
    assert!(body.starts_with(ERROR_PREFIX), "{body}");

    let body = client.send_embed_async(&embed, Some("text"), false).await;
    assert!(body.starts_with(ERROR_PREFIX), "{body}");

    let body = client.send_embeds_async([&embed], None, true).await;
    assert!(body.starts_with(ERROR_PREFIX), "{body}");
}

#[tokio::test]
async fn test_blocking_send_inside_runtime_unreachable() {
    let client = WebhookClient::new(UNREACHABLE).unwrap();
    let embed = EmbedBuilder::new().set_title("lost").build();

    for body in [
        client.send_message("hi", false),
        client.send_embed(&embed, None, false),
        client.send_embeds([&embed], Some("text"), true),
    ] {
        assert!(body.starts_with(ERROR_PREFIX), "{body}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_send_inside_runtime_delivers() {
    let (url, server) = serve_once("200 OK", "sent from runtime");
    // Own transport, so its blocking client is created and dropped on a runtime thread
    let client = WebhookClient::new(&url)
        .unwrap()
        .with_transport(HttpTransport::new());

    let body = client.send_message("from inside tokio", false);
    drop(client);
    let request = tokio::task::spawn_blocking(move || server.join().unwrap())
        .await
        .unwrap();

    assert_eq!(body, "sent from runtime");
    assert_eq!(request.json()["content"], json!("from inside tokio"));
}
