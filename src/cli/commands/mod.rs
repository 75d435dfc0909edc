use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};
use std::path::PathBuf;

pub const ARG_PORT: &str = "port";
pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_DATA_FILE: &str = "data-file";
pub const ARG_FRONTEND_URL: &str = "frontend-url";
pub const ARG_TRUST_API: &str = "trust-api";
pub const ARG_DEV_ROUTES: &str = "dev-routes";
pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("lovedate-admin")
        .about("Admin trust API for the LoveDate platform")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("LOVEDATE_ADMIN_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long("jwt-secret")
                .help("HMAC key for signing and verifying admin tokens")
                .env("ADMIN_JWT_SECRET"),
        )
        .arg(
            Arg::new(ARG_DATA_FILE)
                .long("data-file")
                .help("JSON file backing the user record store (in-memory seed data when unset)")
                .env("LOVEDATE_ADMIN_DATA_FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_FRONTEND_URL)
                .long("frontend-url")
                .help("Admin dashboard origin allowed by CORS")
                .default_value("http://localhost:3000")
                .env("LOVEDATE_ADMIN_FRONTEND_URL"),
        )
        .arg(
            Arg::new(ARG_TRUST_API)
                .long("trust-api")
                .help("Upstream identity service base URL for /api/trust proxying")
                .env("TRUST_API_PROXY_TARGET"),
        )
        .arg(
            Arg::new(ARG_DEV_ROUTES)
                .long("dev-routes")
                .help("Enable dev-only routes: /api/dev/session and /api/dev/seed")
                .env("LOVEDATE_ADMIN_DEV_ROUTES")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("LOVEDATE_ADMIN_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
