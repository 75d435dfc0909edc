use crate::api::{self, ServerConfig};
use crate::cli::actions::Action;
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            jwt_secret,
            data_file,
            frontend_url,
            trust_api,
            dev_routes,
        } => {
            let config = ServerConfig {
                frontend_url,
                trust_api,
                dev_routes,
                data_file,
            };

            api::new(port, jwt_secret, config).await?;
        }
    }

    Ok(())
}
