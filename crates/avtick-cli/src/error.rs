use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// Upstream and validation failures are reported inline and the session
/// keeps running; only terminal I/O failures abort the program.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Io(_) => 10,
        }
    }
}
