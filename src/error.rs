#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("No entry matches the normalized key")]
    KeyNotFound,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
