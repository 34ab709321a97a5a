use chrono::{DateTime, TimeZone, Utc};

use crate::embed::{Author, Color, Embed, Field, Footer, Image, Thumbnail};

/// Chainable constructor for an [`Embed`].
///
/// Every setter overwrites what an earlier call of the same setter stored;
/// only [`EmbedBuilder::add_field`] accumulates.
/// Clone the builder to keep a snapshot before [`EmbedBuilder::build`] consumes it.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct EmbedBuilder {
    embed: Embed,
}

impl EmbedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_author(
        mut self,
        name: impl Into<String>,
        url: Option<&str>,
        icon_url: Option<&str>,
    ) -> Self {
        self.embed.author = Some(Author {
            name: Some(name.into()),
            url: url.map(ToOwned::to_owned),
            icon_url: icon_url.map(ToOwned::to_owned),
        });
        self
    }

    pub fn set_title(mut self, title: impl Into<String>) -> Self {
        self.embed.title = Some(title.into());
        self
    }

    pub fn set_url(mut self, url: impl Into<String>) -> Self {
        self.embed.url = Some(url.into());
        self
    }

    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        self.embed.description = Some(description.into());
        self
    }

    /// Accepts a [`Color`], an `(r, g, b)` tuple, a packed `u32` or a hex `&str`.
    pub fn set_color(mut self, color: impl Into<Color>) -> Self {
        self.embed.color = color.into();
        self
    }

    pub fn set_color_rgb(self, r: u8, g: u8, b: u8) -> Self {
        self.set_color(Color::new(r, g, b))
    }

    /// See [`Color::from_hex`] for the accepted forms. Malformed input sets black.
    pub fn set_color_hex(self, hex: &str) -> Self {
        self.set_color(Color::from_hex(hex))
    }

    pub fn add_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.embed.fields.push(Field::new(name, value, inline));
        self
    }

    pub fn set_footer(mut self, text: impl Into<String>, icon_url: Option<&str>) -> Self {
        self.embed.footer = Some(Footer {
            text: Some(text.into()),
            icon_url: icon_url.map(ToOwned::to_owned),
        });
        self
    }

    /// Stamps the embed with the current time.
    pub fn set_timestamp(self) -> Self {
        self.set_timestamp_at(Utc::now())
    }

    pub fn set_timestamp_at<Tz: TimeZone>(mut self, timestamp: DateTime<Tz>) -> Self {
        self.embed.timestamp = Some(timestamp.with_timezone(&Utc));
        self
    }

    pub fn set_image(mut self, url: impl Into<String>) -> Self {
        self.embed.image = Some(Image {
            url: Some(url.into()),
        });
        self
    }

    pub fn set_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.embed.thumbnail = Some(Thumbnail {
            url: Some(url.into()),
        });
        self
    }

    #[must_use]
    pub fn build(self) -> Embed {
        self.embed
    }
}
