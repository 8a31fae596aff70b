use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerialError {
    #[error("find {0} failed")]
    DeviceNotFound(String),

    #[error("open {port} failed: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    #[error("spawn {name} thread failed: {source}")]
    Spawn {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("serial service disconnected")]
    Disconnected,
}
