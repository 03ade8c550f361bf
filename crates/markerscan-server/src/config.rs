use crate::upload::DEFAULT_MAX_UPLOAD_BYTES;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server settings, from flags or `MARKERSCAN_*` environment variables.
#[derive(Parser, Clone, Debug)]
#[command(name = "markerscan-server")]
#[command(about = "HTTP API for DICT_4X4_50 fiducial marker detection")]
#[command(version)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "MARKERSCAN_ADDR", default_value = "0.0.0.0:8000")]
    pub addr: SocketAddr,

    /// Browser origin allowed to call the API (credentials included).
    #[arg(
        long,
        env = "MARKERSCAN_CORS_ORIGIN",
        default_value = "http://localhost:3000"
    )]
    pub cors_origin: String,

    /// Largest accepted upload, in bytes.
    #[arg(
        long,
        env = "MARKERSCAN_MAX_UPLOAD_BYTES",
        default_value_t = DEFAULT_MAX_UPLOAD_BYTES
    )]
    pub max_upload_bytes: usize,

    /// Detector parameters as JSON (missing fields keep their defaults).
    #[arg(long, env = "MARKERSCAN_PARAMS")]
    pub params: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "MARKERSCAN_LOG_JSON")]
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            cors_origin: "http://localhost:3000".to_owned(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            params: None,
            log_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parsed_defaults() {
        let parsed = ServerConfig::try_parse_from(["markerscan-server"]).expect("parse");
        let default = ServerConfig::default();
        assert_eq!(parsed.addr, default.addr);
        assert_eq!(parsed.cors_origin, default.cors_origin);
        assert_eq!(parsed.max_upload_bytes, 10 * 1024 * 1024);
        assert!(parsed.params.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let parsed = ServerConfig::try_parse_from([
            "markerscan-server",
            "--addr",
            "127.0.0.1:9000",
            "--max-upload-bytes",
            "2048",
            "--log-json",
        ])
        .expect("parse");
        assert_eq!(parsed.addr.port(), 9000);
        assert_eq!(parsed.max_upload_bytes, 2048);
        assert!(parsed.log_json);
    }
}
