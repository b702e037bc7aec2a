use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessResponse {
    pub path: String,
    /// `protected`, `auth`, or `public`.
    pub class: String,
    pub allowed: bool,
    /// Where the client should go instead when not allowed.
    pub redirect: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub token: Option<String>,
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
