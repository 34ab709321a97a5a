use serde::Serialize;

use crate::embed::Embed;

/// The JSON body of a webhook execution.
///
/// Built fresh for every send and only borrows its contents, so the same
/// [`Embed`] can go out in any number of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Message<'a> {
    /// Overrides the webhook's default name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    /// Overrides the webhook's default avatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<&'a str>,
    /// Up to 2000 characters; longer content is rejected by Discord, not here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
    pub tts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<&'a Embed>>,
}

impl<'a> Message<'a> {
    #[must_use]
    pub const fn text(content: &'a str, tts: bool) -> Self {
        Self {
            username: None,
            avatar_url: None,
            content: Some(content),
            tts,
            embeds: None,
        }
    }

    #[must_use]
    pub fn with_embeds(
        embeds: impl IntoIterator<Item = &'a Embed>,
        content: Option<&'a str>,
        tts: bool,
    ) -> Self {
        Self {
            username: None,
            avatar_url: None,
            content,
            tts,
            embeds: Some(embeds.into_iter().collect()),
        }
    }

    /// Sets the sender identity shown instead of the webhook's defaults.
    #[must_use]
    pub fn identity(mut self, username: Option<&'a str>, avatar_url: Option<&'a str>) -> Self {
        self.username = username;
        self.avatar_url = avatar_url;
        self
    }

    #[must_use]
    pub fn embed_count(&self) -> usize {
        self.embeds.as_ref().map_or(0, Vec::len)
    }
}
