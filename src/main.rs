mod logging;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use discord_webhook::{Color, Embed, EmbedBuilder, Message, WebhookClient, WebhookResponse};

/// Send a message to a Discord webhook
#[derive(Parser)]
struct Args {
    /// The Discord WebHook URL to post to
    #[arg(short, long)]
    webhook_url: String,

    /// Overrides the webhook's default username
    #[arg(short, long)]
    username: Option<String>,

    /// Overrides the webhook's default avatar
    #[arg(long)]
    avatar_url: Option<String>,

    /// Plain message text (up to 2000 characters)
    #[arg(short, long)]
    content: Option<String>,

    /// Ask clients to read the message aloud
    #[arg(long)]
    tts: bool,

    /// Embed title
    #[arg(short, long)]
    title: Option<String>,

    /// Embed description
    #[arg(short, long)]
    description: Option<String>,

    /// Link target of the embed title
    #[arg(long)]
    url: Option<String>,

    /// Embed color as `RRGGBB` or `RGB`, optionally prefixed with `#`
    #[arg(long, value_parser = parse_color)]
    color: Option<Color>,

    /// Embed author name
    #[arg(long)]
    author: Option<String>,

    /// Embed footer text
    #[arg(long)]
    footer: Option<String>,

    /// Embed image URL
    #[arg(long)]
    image: Option<String>,

    /// Embed thumbnail URL
    #[arg(long)]
    thumbnail: Option<String>,

    /// Embed field as `name=value`; may be repeated
    #[arg(short, long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Lay the embed fields out side by side
    #[arg(long)]
    inline_fields: bool,

    /// Stamp the embed with the current time
    #[arg(long)]
    timestamp: bool,

    /// More log output; repeat for more detail (-vv shows the outgoing request)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn has_embed(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.url.is_some()
            || self.color.is_some()
            || self.author.is_some()
            || self.footer.is_some()
            || self.image.is_some()
            || self.thumbnail.is_some()
            || !self.fields.is_empty()
            || self.timestamp
    }

    fn build_embed(&self) -> Embed {
        let mut builder = EmbedBuilder::new();
        if let Some(title) = &self.title {
            builder = builder.set_title(title);
        }
        if let Some(description) = &self.description {
            builder = builder.set_description(description);
        }
        if let Some(url) = &self.url {
            builder = builder.set_url(url);
        }
        if let Some(color) = self.color {
            builder = builder.set_color(color);
        }
        if let Some(author) = &self.author {
            builder = builder.set_author(author, None, None);
        }
        if let Some(footer) = &self.footer {
            builder = builder.set_footer(footer, None);
        }
        if let Some(image) = &self.image {
            builder = builder.set_image(image);
        }
        if let Some(thumbnail) = &self.thumbnail {
            builder = builder.set_thumbnail(thumbnail);
        }
        for (name, value) in &self.fields {
            builder = builder.add_field(name, value, self.inline_fields);
        }
        if self.timestamp {
            builder = builder.set_timestamp();
        }
        builder.build()
    }
}

fn parse_color(hex: &str) -> Result<Color, String> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected RRGGBB or RGB hex color, got {hex:?}"));
    }
    Ok(Color::from_hex(hex))
}

fn parse_field(field: &str) -> Result<(String, String), String> {
    let (name, value) = field
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {field:?}"))?;
    Ok((name.to_owned(), value.to_owned()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    if args.content.is_none() && !args.has_embed() {
        bail!("Nothing to send; pass --content or at least one embed option");
    }

    let mut client =
        WebhookClient::new(&args.webhook_url).context("Could not create Discord Webhook Client")?;
    if let Some(username) = &args.username {
        client = client.with_username(username);
    }
    if let Some(avatar_url) = &args.avatar_url {
        client = client.with_avatar_url(avatar_url);
    }

    let embed = args.has_embed().then(|| args.build_embed());
    let message = match &embed {
        Some(embed) => Message::with_embeds([embed], args.content.as_deref(), args.tts),
        None => Message::text(args.content.as_deref().unwrap_or_default(), args.tts),
    }
    .identity(client.username(), client.avatar_url());

    let response = client
        .execute(&message)
        .context("Could not send message to webhook")?;
    log::info!("Webhook responded with {}", response.status);

    check_response(&response)?;
    if !response.body.is_empty() {
        println!("{}", response.body);
    }
    Ok(())
}

fn check_response(response: &WebhookResponse) -> Result<()> {
    if !response.is_success() {
        bail!("Webhook rejected the message ({}): {}", response.status, response.body);
    }
    Ok(())
}
