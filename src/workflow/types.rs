use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const STATUS_SUCCESS: &str = "success";

/// `{ status, data }` wrapper every workflow API response uses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: String,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    pub fn into_data(self, what: &str) -> Result<T> {
        if !self.is_success() {
            bail!(
                "Failed to fetch {}: status '{}'{}",
                what,
                self.status,
                self.message.map(|m| format!(" ({})", m)).unwrap_or_default()
            );
        }
        match self.data {
            Some(data) => Ok(data),
            None => bail!("Failed to fetch {}: response has no data", what),
        }
    }
}

/// Which update route publishing posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateEndpoint {
    #[default]
    Current,
    /// `update_old`, kept for deployments that have not moved to `update`.
    Legacy,
}

impl UpdateEndpoint {
    pub fn path_segment(&self) -> &'static str {
        match self {
            UpdateEndpoint::Current => "update",
            UpdateEndpoint::Legacy => "update_old",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let env: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":"success","data":[1,2]}"#).unwrap();
        assert_eq!(env.into_data("numbers").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_envelope_failure_status() {
        let env: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":"error","message":"nope"}"#).unwrap();
        let err = env.into_data("numbers").unwrap_err().to_string();
        assert!(err.contains("status 'error'"));
        assert!(err.contains("nope"));
    }

    #[test]
    fn test_envelope_missing_data() {
        let env: ApiEnvelope<Vec<u32>> = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(env.into_data("numbers").is_err());
    }
}
