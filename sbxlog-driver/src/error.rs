//! Driver errors

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Driver library not found at {path}")]
    DriverNotFound { path: String },

    #[error("Failed to load driver library {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("Failed to resolve driver entry point '{name}': {source}")]
    MissingSymbol {
        name: String,
        #[source]
        source: libloading::Error,
    },

    #[error("Driver string allocation failed")]
    StringAlloc,

    #[error("Driver returned a null string handle")]
    NullStringHandle,
}
