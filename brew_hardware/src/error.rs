use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("invalid analog pin {pin}: {reason}")]
    InvalidPin { pin: u32, reason: String },
    #[error("read failed for {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("unparseable value {value:?} at {path}")]
    Parse { path: String, value: String },
}

pub type Result<T> = std::result::Result<T, HwError>;
