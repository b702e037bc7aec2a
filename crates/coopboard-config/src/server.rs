use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Built page bundle served behind the gate. Unset means only the API is served.
    pub pages_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            pages_dir: env::var("PAGES_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            pages_dir: None,
        }
    }
}
