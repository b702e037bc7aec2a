//! # Coopboard Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`session`]: session token signing, lifetime, and cookie settings
//! - [`gate`]: sign-in, landing, and fallback paths plus extra gate exclusions
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: bind address and page bundle directory
//!
//! # Example
//!
//! ```ignore
//! use coopboard_config::{GateConfig, SessionConfig};
//!
//! let session_config = SessionConfig::from_env();
//! let gate_config = GateConfig::from_env();
//! ```

pub mod cors;
pub mod gate;
pub mod server;
pub mod session;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use gate::GateConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;

pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"))
        .unwrap_or(default)
}
