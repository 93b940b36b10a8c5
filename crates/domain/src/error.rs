/// Shared error type used across all cronkit crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cron: {0}")]
    Cron(#[from] ck_cron::CronError),
}

pub type Result<T> = std::result::Result<T, Error>;
