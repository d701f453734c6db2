use std::net::SocketAddr;
use std::path::PathBuf;

/// Relay policy switches.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Tell remaining members when a peer leaves or disconnects.
    pub notify_peer_left: bool,

    /// Only relay negotiation frames between members of the same session.
    pub enforce_same_session: bool,

    /// Send `delivery-failed` back to the sender when a frame is dropped.
    pub report_delivery_failures: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            notify_peer_left: true,
            enforce_same_session: true,
            report_delivery_failures: true,
        }
    }
}

/// Where uploaded captures land and how they are addressed afterwards.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub upload_dir: PathBuf,
    /// Prefix of returned URLs, without trailing slash.
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            public_base_url: "http://localhost:5000".to_owned(),
            max_upload_bytes: 512 * 1024 * 1024,
        }
    }
}

/// Everything the HTTP front needs to come up.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Single browser origin allowed by CORS. `None` allows any origin.
    pub allowed_origin: Option<String>,
    pub relay: RelayConfig,
    pub upload: UploadConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            allowed_origin: Some("http://localhost:5173".to_owned()),
            relay: RelayConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}
