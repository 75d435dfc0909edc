use crate::api::handlers::auth::DEFAULT_DEV_SECRET;
use crate::cli::{actions::Action, commands};
use anyhow::Result;
use secrecy::SecretString;
use std::path::PathBuf;

/// Resolve the token signing key: `--jwt-secret` / `ADMIN_JWT_SECRET` first,
/// then the platform-wide `JWT_SECRET`, then the fixed dev default.
fn resolve_jwt_secret(matches: &clap::ArgMatches) -> SecretString {
    if let Some(secret) = matches.get_one::<String>(commands::ARG_JWT_SECRET) {
        return SecretString::from(secret.clone());
    }
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        if !secret.is_empty() {
            return SecretString::from(secret);
        }
    }
    SecretString::from(DEFAULT_DEV_SECRET)
}

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches
            .get_one::<u16>(commands::ARG_PORT)
            .copied()
            .unwrap_or(8080),
        jwt_secret: resolve_jwt_secret(matches),
        data_file: matches.get_one::<PathBuf>(commands::ARG_DATA_FILE).cloned(),
        frontend_url: matches
            .get_one::<String>(commands::ARG_FRONTEND_URL)
            .map_or_else(|| "http://localhost:3000".to_string(), String::clone),
        trust_api: matches
            .get_one::<String>(commands::ARG_TRUST_API)
            .cloned(),
        dev_routes: matches.get_flag(commands::ARG_DEV_ROUTES),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn matches_from(args: &[&str]) -> clap::ArgMatches {
        commands::new().get_matches_from(args)
    }

    #[test]
    fn test_explicit_secret_wins() {
        temp_env::with_var("JWT_SECRET", Some("platform-wide"), || {
            let matches = matches_from(&["lovedate-admin", "--jwt-secret", "explicit"]);
            let secret = resolve_jwt_secret(&matches);
            assert_eq!(secret.expose_secret(), "explicit");
        });
    }

    #[test]
    fn test_jwt_secret_env_fallback() {
        temp_env::with_vars(
            [
                ("ADMIN_JWT_SECRET", None::<&str>),
                ("JWT_SECRET", Some("platform-wide")),
            ],
            || {
                let matches = matches_from(&["lovedate-admin"]);
                let secret = resolve_jwt_secret(&matches);
                assert_eq!(secret.expose_secret(), "platform-wide");
            },
        );
    }

    #[test]
    fn test_dev_default_secret() {
        temp_env::with_vars(
            [("ADMIN_JWT_SECRET", None::<&str>), ("JWT_SECRET", None)],
            || {
                let matches = matches_from(&["lovedate-admin"]);
                let secret = resolve_jwt_secret(&matches);
                assert_eq!(secret.expose_secret(), DEFAULT_DEV_SECRET);
            },
        );
    }

    #[test]
    fn test_server_action() -> Result<()> {
        let matches = matches_from(&[
            "lovedate-admin",
            "--port",
            "9191",
            "--trust-api",
            "https://identity.lovedate.dev",
        ]);
        let Action::Server {
            port,
            trust_api,
            dev_routes,
            data_file,
            ..
        } = handler(&matches)?;
        assert_eq!(port, 9191);
        assert_eq!(trust_api.as_deref(), Some("https://identity.lovedate.dev"));
        assert!(!dev_routes);
        assert!(data_file.is_none());
        Ok(())
    }
}
