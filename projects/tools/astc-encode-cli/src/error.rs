use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Encode(#[from] astc_encode_api::AstcEncodeError),
    #[error(transparent)]
    FileOperation(#[from] astc_encode_file_formats_api::FileOperationError),
    #[error(transparent)]
    Mmap(#[from] astc_encode_file_formats_api::file_io::LightweightMmapError),
    #[error("{0}")]
    InvalidInput(String),
}
