pub mod server;

use secrecy::SecretString;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        jwt_secret: SecretString,
        data_file: Option<PathBuf>,
        frontend_url: String,
        trust_api: Option<String>,
        dev_routes: bool,
    },
}
