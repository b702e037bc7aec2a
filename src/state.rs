use std::sync::Arc;

use anyhow::Context;
use coopboard_auth::{AuthProviderDyn, JwtAuthProvider};
use coopboard_config::{CorsConfig, GateConfig, ServerConfig, SessionConfig};
use coopboard_core::{ExclusionMatcher, RoutePolicy};

use crate::middleware::gate::EdgeGate;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<EdgeGate>,
    pub gate_config: GateConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
}

impl AppState {
    /// Builds state around `provider`, rejecting a policy or gate paths that
    /// would misroute users.
    pub fn new(
        provider: Arc<dyn AuthProviderDyn>,
        policy: RoutePolicy,
        session_config: SessionConfig,
        gate_config: GateConfig,
        cors_config: CorsConfig,
        server_config: ServerConfig,
    ) -> anyhow::Result<Self> {
        policy
            .validate(&gate_config.fallback_path)
            .context("invalid route policy")?;
        policy
            .validate_gate_paths(&gate_config.sign_in_path, &gate_config.landing_path)
            .context("invalid gate paths")?;

        let exclusions =
            ExclusionMatcher::extended(gate_config.extra_exclusions.iter().map(String::as_str));

        let gate = EdgeGate::new(
            Arc::new(policy),
            exclusions,
            provider,
            session_config,
            &gate_config,
        );

        Ok(Self {
            gate: Arc::new(gate),
            gate_config,
            cors_config,
            server_config,
        })
    }
}

pub fn init_app_state() -> anyhow::Result<AppState> {
    let session_config = SessionConfig::from_env();
    let provider = Arc::new(JwtAuthProvider::new(session_config.clone()));

    AppState::new(
        provider,
        RoutePolicy::default(),
        session_config,
        GateConfig::from_env(),
        CorsConfig::from_env(),
        ServerConfig::from_env(),
    )
}
