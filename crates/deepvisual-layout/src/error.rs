#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no entities to lay out: the table has no self-loop rows")]
    EmptyInput,
    #[error("layout radius must be a positive finite number, got {radius}")]
    InvalidRadius { radius: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
