use thiserror::Error;

/// Result type for scene conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing conversion side products
///
/// Scene construction itself is infallible: record lookups that miss
/// degrade to absent properties and damaged geometry is skipped. The only
/// fallible surface is exporting embedded texture images to disk.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Texture write failed: {0}")]
    TextureWrite(#[from] std::io::Error),
}
