use std::error::Error as _;
use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};
use std::thread;

use reqwest::StatusCode;
use tokio::runtime::Handle;
use url::Url;

use crate::{
    embed::Embed,
    error::{Error, Result},
    message::Message,
    validate,
};

/// Start of the text returned by the `send_*` methods when the request could not be made.
pub const ERROR_PREFIX: &str = "Error when request discord webhook url. Error Message:";

const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Connection pool shared by webhook clients.
///
/// Cloning is cheap and keeps using the same connections. The blocking client
/// is only created on the first blocking send, so async-only programs never
/// start its background runtime.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    inner: Arc<TransportInner>,
}

#[derive(Debug, Default)]
struct TransportInner {
    client: reqwest::Client,
    blocking: OnceLock<reqwest::blocking::Client>,
}

impl Drop for TransportInner {
    fn drop(&mut self) {
        // Dropping a blocking client shuts down its runtime, which tokio forbids on a runtime thread
        if let Some(blocking) = self.blocking.take()
            && Handle::try_current().is_ok()
        {
            thread::spawn(move || drop(blocking));
        }
    }
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already configured async client (custom timeouts, proxies, ...).
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        let inner = TransportInner {
            client,
            blocking: OnceLock::new(),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// The process-wide transport used by [`WebhookClient::new`].
    #[must_use]
    pub fn shared() -> Self {
        static SHARED: OnceLock<HttpTransport> = OnceLock::new();
        SHARED.get_or_init(Self::new).clone()
    }

    fn client(&self) -> &reqwest::Client {
        &self.inner.client
    }

    fn blocking(&self) -> &reqwest::blocking::Client {
        self.inner
            .blocking
            .get_or_init(reqwest::blocking::Client::new)
    }
}

/// What the webhook endpoint answered, whatever the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: StatusCode,
    /// Empty for a plain `204 No Content` success.
    pub body: String,
}

impl WebhookResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Sends messages to a single Discord webhook.
///
/// The `send_*` methods never fail: they return the response body, or a text
/// starting with [`ERROR_PREFIX`] when the request could not be completed. Use
/// [`WebhookClient::execute`] and [`WebhookClient::execute_async`] to get a
/// [`Result`] with the status code instead.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    transport: HttpTransport,
    url: Url,
    username: Option<String>,
    avatar_url: Option<String>,
}

impl WebhookClient {
    /// # Errors
    /// [`Error::InvalidUrl`] if `webhook_url` is not an absolute URI.
    pub fn new(webhook_url: &str) -> Result<Self> {
        let url = Url::parse(webhook_url).map_err(|source| Error::InvalidUrl {
            url: webhook_url.to_owned(),
            source,
        })?;
        Ok(Self {
            transport: HttpTransport::shared(),
            url,
            username: None,
            avatar_url: None,
        })
    }

    /// # Errors
    /// [`Error::InvalidToken`] if the token is empty or contains characters
    /// Discord never puts into webhook tokens.
    pub fn from_parts(id: u64, token: &str) -> Result<Self> {
        validate::webhook_token(token)?;
        Self::new(&format!("https://discord.com/api/webhooks/{id}/{token}"))
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    #[must_use]
    pub fn with_transport(mut self, transport: HttpTransport) -> Self {
        self.transport = transport;
        self
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn send_message(&self, content: &str, tts: bool) -> String {
        let message = self.identify(Message::text(content, tts));
        describe(self.execute(&message))
    }

    pub fn send_embed(&self, embed: &Embed, content: Option<&str>, tts: bool) -> String {
        self.send_embeds([embed], content, tts)
    }

    pub fn send_embeds<'a>(
        &'a self,
        embeds: impl IntoIterator<Item = &'a Embed>,
        content: Option<&'a str>,
        tts: bool,
    ) -> String {
        let message = self.identify(Message::with_embeds(embeds, content, tts));
        describe(self.execute(&message))
    }

    pub async fn send_message_async(&self, content: &str, tts: bool) -> String {
        let message = self.identify(Message::text(content, tts));
        describe(self.execute_async(&message).await)
    }

    pub async fn send_embed_async(
        &self,
        embed: &Embed,
        content: Option<&str>,
        tts: bool,
    ) -> String {
        self.send_embeds_async([embed], content, tts).await
    }

    pub async fn send_embeds_async<'a>(
        &'a self,
        embeds: impl IntoIterator<Item = &'a Embed>,
        content: Option<&'a str>,
        tts: bool,
    ) -> String {
        let message = self.identify(Message::with_embeds(embeds, content, tts));
        describe(self.execute_async(&message).await)
    }

    /// Posts `message` as-is and blocks until the whole response body is read.
    ///
    /// Inside an async runtime the request is made from a helper thread while
    /// the calling thread waits, so prefer [`WebhookClient::execute_async`] there.
    ///
    /// # Errors
    /// Serialization or transport failures. Non-2xx responses are returned as
    /// [`WebhookResponse`], not as errors.
    pub fn execute(&self, message: &Message<'_>) -> Result<WebhookResponse> {
        let body = self.serialize(message)?;
        if Handle::try_current().is_err() {
            return self.post_blocking(body);
        }

        log::debug!("Blocking send inside an async runtime; using a helper thread");
        thread::scope(|scope| scope.spawn(move || self.post_blocking(body)).join())
            .unwrap_or(Err(Error::HelperThread))
    }

    fn post_blocking(&self, body: Vec<u8>) -> Result<WebhookResponse> {
        let resp = self
            .transport
            .blocking()
            .post(self.url.clone())
            .header("Content-Type", CONTENT_TYPE)
            .body(body)
            .send()
            .map_err(hide_url)?;
        let status = resp.status();
        let body = resp.text().map_err(hide_url)?;
        log::debug!("Webhook responded with status {status}");
        Ok(WebhookResponse { status, body })
    }

    /// Async version of [`WebhookClient::execute`].
    ///
    /// # Errors
    /// Serialization or transport failures.
    pub async fn execute_async(&self, message: &Message<'_>) -> Result<WebhookResponse> {
        let body = self.serialize(message)?;
        let resp = self
            .transport
            .client()
            .post(self.url.clone())
            .header("Content-Type", CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(hide_url)?;
        let status = resp.status();
        let body = resp.text().await.map_err(hide_url)?;
        log::debug!("Webhook responded with status {status}");
        Ok(WebhookResponse { status, body })
    }

    fn identify<'a>(&'a self, message: Message<'a>) -> Message<'a> {
        message.identity(self.username(), self.avatar_url())
    }

    fn serialize(&self, message: &Message<'_>) -> Result<Vec<u8>> {
        // The path holds the webhook token; only log the host
        log::debug!(
            "Posting message to webhook on {} ({} embeds, tts: {})",
            self.url.host_str().unwrap_or("<no host>"),
            message.embed_count(),
            message.tts,
        );
        Ok(serde_json::to_vec(message)?)
    }
}

/// Flattens a send result into the text the `send_*` methods return.
#[must_use]
pub fn describe(result: Result<WebhookResponse>) -> String {
    match result {
        Ok(response) => response.body,
        Err(err) => {
            let details = error_details(&err);
            log::warn!("Sending webhook message failed: {details}");
            format!("{ERROR_PREFIX} {details}")
        }
    }
}

/// reqwest puts the full URL, token included, into its error messages.
fn hide_url(err: reqwest::Error) -> Error {
    Error::Http(err.without_url())
}

fn error_details(err: &Error) -> String {
    let mut details = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !details.contains(&text) {
            let _ = write!(details, ": {text}");
        }
        source = cause.source();
    }
    details
}
