pub mod server;

use secrecy::SecretString;

/// Actions the CLI can dispatch. `SecretString` keeps the signing secret
/// out of any derived `Debug` output.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        token_secret: SecretString,
    },
}
