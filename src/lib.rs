#![deny(unexpected_cfgs)]
//
#![warn(clippy::cargo)]
#![warn(clippy::nursery)]
//
// https://github.com/rust-lang/rust-clippy/issues/16440
#![allow(clippy::multiple_crate_versions)]

//! Build Discord embeds and post them, or plain text, to an incoming webhook.
//!
//! ```no_run
//! use discord_webhook::{EmbedBuilder, WebhookClient};
//!
//! let client = WebhookClient::new("https://discord.com/api/webhooks/123/token")?
//!     .with_username("Deploy Bot");
//! let embed = EmbedBuilder::new()
//!     .set_title("Deployment finished")
//!     .set_color_hex("#57F287")
//!     .add_field("Environment", "production", true)
//!     .set_timestamp()
//!     .build();
//! let body = client.send_embed(&embed, Some("@here"), false);
//! println!("{body}");
//! # Ok::<(), discord_webhook::Error>(())
//! ```

mod validate;

pub mod embed;
pub mod error;
pub mod message;
pub mod webhook;

pub use embed::{Color, Embed, EmbedBuilder, Field};
pub use error::{Error, Result};
pub use message::Message;
pub use webhook::{ERROR_PREFIX, HttpTransport, WebhookClient, WebhookResponse};
