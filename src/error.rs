use thiserror::Error;

/// Errors surfaced by this crate
///
/// Logging itself never fails; these only come from configuration paths.
#[derive(Debug, Error)]
pub enum Error {
    /// A level name outside of `debug`, `info`, `warn` and `error`
    #[error("unknown log level `{0}`")]
    UnknownLevel(String),

    /// A global `log` logger was already installed
    #[error(transparent)]
    SetLogger(#[from] log::SetLoggerError),
}
