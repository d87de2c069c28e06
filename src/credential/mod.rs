//! `ExecCredential` envelope kubectl reads from the plugin's stdout.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

pub const EXEC_CREDENTIAL_API_VERSION: &str = "client.authentication.k8s.io/v1";
pub const EXEC_CREDENTIAL_KIND: &str = "ExecCredential";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredential {
    pub api_version: String,
    pub kind: String,
    pub status: ExecCredentialStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExecCredentialStatus {
    pub token: String,
}

impl ExecCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_version: EXEC_CREDENTIAL_API_VERSION.to_owned(),
            kind: EXEC_CREDENTIAL_KIND.to_owned(),
            status: ExecCredentialStatus { token: token.into() },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to marshal ExecCredential")
    }
}

/// Write the envelope for `token` as one compact JSON line.
pub fn write_exec_credential<W: Write>(out: &mut W, token: &str) -> Result<()> {
    let json = ExecCredential::new(token).to_json()?;
    writeln!(out, "{}", json).context("failed to write ExecCredential")?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn envelope_is_a_single_json_line() {
        let mut out = Vec::new();
        write_exec_credential(&mut out, "test-token").unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);
        assert_eq!(
            text,
            "{\"apiVersion\":\"client.authentication.k8s.io/v1\",\"kind\":\"ExecCredential\",\"status\":{\"token\":\"test-token\"}}\n"
        );
    }

    #[test]
    fn token_is_json_escaped() {
        let json = ExecCredential::new("a\"b").to_json().unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["status"]["token"], "a\"b");
    }
}
