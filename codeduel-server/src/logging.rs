use std::fmt::Display;

use colored::Colorize;
use log::Level;

/// Levels below info are noise outside of debugging sessions
const LOCAL_LEVELS: [Level; 3] = [Level::Info, Level::Warn, Level::Error];
/// External crates only get to log problems
const EXTERNAL_LEVELS: [Level; 2] = [Level::Warn, Level::Error];

pub fn init_logger() {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let source = Source::of(record.target());
            let time = chrono::Local::now().format("%H:%M:%S");

            out.finish(format_args!(
                "{} {} {:^6} {}",
                badge(record.level()),
                time.to_string().bright_black(),
                source,
                message
            ))
        })
        .filter(|meta| {
            let levels = match Source::of(meta.target()) {
                Source::External(_) => &EXTERNAL_LEVELS[..],
                _ => &LOCAL_LEVELS[..],
            };

            levels.contains(&meta.level())
        })
        .chain(std::io::stdout())
        .apply()
        .expect("logging is initialized")
}

enum Source {
    External(String),
    Server,
    Core,
}

impl Source {
    fn of(target: &str) -> Self {
        match target.split("::").next().unwrap_or_default() {
            "codeduel_core" => Self::Core,
            "codeduel_server" => Self::Server,
            other => Self::External(other.to_string()),
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            Source::External(name) => name.as_str().clear(),
            Source::Server => "SERVER".bright_green(),
            Source::Core => "CORE".blue(),
        };

        Display::fmt(&result, f)
    }
}

fn badge(level: Level) -> String {
    match level {
        Level::Error => " ERR ".black().on_red().bold().to_string(),
        Level::Warn => " WRN ".black().on_yellow().bold().to_string(),
        Level::Info => " INF ".black().on_blue().bold().to_string(),
        Level::Debug => " DBG ".white().on_black().to_string(),
        Level::Trace => " TRC ".to_string(),
    }
}
