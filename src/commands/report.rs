//! Structured result handed back to the host.

use serde::Serialize;

use crate::package::DesiredState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<DesiredState>,
    pub changed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl ModuleReport {
    pub fn success(name: &str, state: DesiredState, changed: bool) -> Self {
        Self {
            name: Some(name.to_string()),
            state: Some(state),
            changed,
            failed: false,
            msg: None,
        }
    }

    pub fn failure(name: &str, state: DesiredState, msg: impl Into<String>) -> Self {
        Self {
            name: Some(name.to_string()),
            state: Some(state),
            changed: false,
            failed: true,
            msg: Some(msg.into()),
        }
    }

    /// Failure before the parameters were understood.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self {
            name: None,
            state: None,
            changed: false,
            failed: true,
            msg: Some(msg.into()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
