use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotifError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Runtime(String),
}

impl MotifError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        MotifError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, MotifError>;

pub fn handle_error_and_exit(err: MotifError) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
