#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Buffer length disagrees with the descriptor, or the channel count is
    /// not one the engines accept.
    #[error("Invalid shape: {0}")]
    InvalidShape(String),
    /// Samples are not 8-bit unsigned integers.
    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),
    /// Adapter, allocation or dispatch failure on the accelerator.
    #[error("Device resource error: {0}")]
    DeviceResource(String),
}

pub type Result<T> = std::result::Result<T, Error>;
