use std::io::Write;

use chrono::Utc;
use colored::{Color, Colorize as _};
use env_logger::{Builder, Env};
use log::{Level, LevelFilter};

const CRATE_TARGET: &str = "discord_webhook";

/// Sets up the colored stderr logger.
///
/// Each `-v` lowers the default level by one step; `RUST_LOG` overrides it entirely.
pub fn init(verbosity: u8) {
    let mut builder = Builder::new();

    let default = level_for(verbosity).as_str().to_ascii_lowercase();
    builder.parse_env(Env::default().default_filter_or(default));

    builder.format(|f, record| {
        let time = Utc::now().format("%H:%M:%S%.3f").to_string().dimmed();
        let color = color_by_level(record.level());
        let level = format!("{:<5}", record.level()).color(color).bold();
        let target = short_target(record.target()).dimmed();

        writeln!(f, "{time} {level} {target}: {}", record.args())
    });

    builder.init();
}

/// Quiet by default: a successful send prints nothing but the response body.
const fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// `discord_webhook::webhook` becomes `webhook`; other crates keep their full path.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix(CRATE_TARGET)
        .map(|rest| rest.trim_start_matches("::"))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(target)
}

const fn color_by_level(level: Level) -> Color {
    match level {
        Level::Trace => Color::Magenta,
        Level::Debug => Color::Blue,
        Level::Info => Color::Green,
        Level::Warn => Color::Yellow,
        Level::Error => Color::Red,
    }
}
