use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum CallError {
    #[error("HTTP module requires baseUri to be configured")]
    MissingBaseUri,

    #[error("the owning module was dropped")]
    ModuleDropped,

    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
