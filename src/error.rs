use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading input or writing the finished document failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// An image could not be placed on the page.
    #[error("image error: {0}")]
    Image(String),
    /// The structured input document could not be understood.
    #[error("invalid input: {0}")]
    Input(String),
}
