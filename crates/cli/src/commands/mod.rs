//! CLI subcommands.

pub mod migrate;
pub mod snapshot;

use secrecy::SecretString;

/// Read `DATABASE_URL`, loading `.env` first if present.
pub fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").ok().map(SecretString::from)
}
