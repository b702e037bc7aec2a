//! Principal roles.
//!
//! Every principal carries exactly one [`Role`]. The role is assigned when the
//! profile is created and only changes through administrative action, so the
//! gate and guard treat it as a read-only attribute of the session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role tag attached to an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Applicant,
    CoApplicant,
    Guarantor,
    Broker,
    /// Managing agent / administrator. Works the `/agent` area.
    #[serde(alias = "agent")]
    Admin,
    Board,
    /// Read-only access for the purchaser's or seller's attorney.
    Attorney,
    /// Read-only access granted by an admin.
    Viewer,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Applicant,
        Role::CoApplicant,
        Role::Guarantor,
        Role::Broker,
        Role::Admin,
        Role::Board,
        Role::Attorney,
        Role::Viewer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Applicant => "applicant",
            Role::CoApplicant => "co_applicant",
            Role::Guarantor => "guarantor",
            Role::Broker => "broker",
            Role::Admin => "admin",
            Role::Board => "board",
            Role::Attorney => "attorney",
            Role::Viewer => "viewer",
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, Role::Attorney | Role::Viewer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "applicant" => Ok(Role::Applicant),
            "co_applicant" => Ok(Role::CoApplicant),
            "guarantor" => Ok(Role::Guarantor),
            "broker" => Ok(Role::Broker),
            "admin" | "agent" => Ok(Role::Admin),
            "board" => Ok(Role::Board),
            "attorney" => Ok(Role::Attorney),
            "viewer" => Ok(Role::Viewer),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}
