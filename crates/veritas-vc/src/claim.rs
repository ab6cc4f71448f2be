//! # Claim Payloads
//!
//! The two kinds of `credentialSubject` Veritas issues. The credential
//! `type` array carries the kind; the verification pipeline never needs to
//! know which one it is looking at.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use veritas_core::Timestamp;

use crate::error::VcError;

/// Base W3C credentials context, always first in `@context`.
pub const W3C_CREDENTIALS_V1: &str = "https://www.w3.org/2018/credentials/v1";
/// Type entry every credential carries.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

pub const EMPLOYMENT_CREDENTIAL_TYPE: &str = "ProofOfEmploymentCredential";
pub const EMPLOYMENT_CONTEXT: &str = "https://veritas.id/contexts/employment/v1";

pub const GITHUB_CREDENTIAL_TYPE: &str = "GitHubReputationCredential";
pub const GITHUB_CONTEXT: &str = "https://veritas.id/contexts/github/v1";

/// Which claim a credential carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimKind {
    Employment,
    GitHubReputation,
}

impl ClaimKind {
    /// The credential `type` entry for this kind.
    pub fn credential_type(self) -> &'static str {
        match self {
            Self::Employment => EMPLOYMENT_CREDENTIAL_TYPE,
            Self::GitHubReputation => GITHUB_CREDENTIAL_TYPE,
        }
    }

    /// The `@context` entry for this kind.
    pub fn context(self) -> &'static str {
        match self {
            Self::Employment => EMPLOYMENT_CONTEXT,
            Self::GitHubReputation => GITHUB_CONTEXT,
        }
    }

    /// Find the kind named in a credential `type` array.
    pub fn from_types(types: &[String]) -> Option<Self> {
        types.iter().find_map(|t| match t.as_str() {
            EMPLOYMENT_CREDENTIAL_TYPE => Some(Self::Employment),
            GITHUB_CREDENTIAL_TYPE => Some(Self::GitHubReputation),
            _ => None,
        })
    }
}

/// Proof of employment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentClaim {
    /// Holder DID.
    pub id: String,
    pub employer: String,
    pub role: String,
    /// ISO 8601 date, as supplied by the employer.
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// GitHub account statistics at verification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubReputation {
    pub followers: u64,
    pub public_repos: u64,
    /// Days since the account was created.
    pub account_age: u64,
}

/// GitHub reputation attested after an OAuth login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubReputationClaim {
    /// Holder DID.
    pub id: String,
    pub username: String,
    pub profile_url: String,
    pub reputation: GitHubReputation,
    pub verified_at: Timestamp,
}

/// A typed `credentialSubject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimPayload {
    Employment(EmploymentClaim),
    GitHubReputation(GitHubReputationClaim),
}

impl ClaimPayload {
    pub fn kind(&self) -> ClaimKind {
        match self {
            Self::Employment(_) => ClaimKind::Employment,
            Self::GitHubReputation(_) => ClaimKind::GitHubReputation,
        }
    }

    /// The holder DID this claim is about.
    pub fn subject_id(&self) -> &str {
        match self {
            Self::Employment(c) => &c.id,
            Self::GitHubReputation(c) => &c.id,
        }
    }

    /// Replace the holder DID.
    pub fn set_subject_id(&mut self, holder: impl Into<String>) {
        match self {
            Self::Employment(c) => c.id = holder.into(),
            Self::GitHubReputation(c) => c.id = holder.into(),
        }
    }

    /// Render as a `credentialSubject` JSON object.
    pub fn to_subject(&self) -> Result<Value, VcError> {
        Ok(match self {
            Self::Employment(c) => serde_json::to_value(c)?,
            Self::GitHubReputation(c) => serde_json::to_value(c)?,
        })
    }

    /// Decode a `credentialSubject` of the given kind.
    pub fn from_subject(kind: ClaimKind, subject: &Value) -> Result<Self, VcError> {
        let decoded = match kind {
            ClaimKind::Employment => {
                serde_json::from_value(subject.clone()).map(Self::Employment)
            }
            ClaimKind::GitHubReputation => {
                serde_json::from_value(subject.clone()).map(Self::GitHubReputation)
            }
        };
        decoded.map_err(|e| {
            VcError::MalformedCredential(format!(
                "credentialSubject is not a valid {}: {e}",
                kind.credential_type()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn employment_wire_names() {
        let claim = ClaimPayload::Employment(EmploymentClaim {
            id: "did:ethr:polygon:0x00".into(),
            employer: "Acme".into(),
            role: "Engineer".into(),
            start_date: "2023-01-01".into(),
            end_date: None,
        });
        let v = claim.to_subject().unwrap();
        assert_eq!(v["startDate"], "2023-01-01");
        assert!(v.get("endDate").is_none());
        assert_eq!(claim.kind().credential_type(), "ProofOfEmploymentCredential");
    }

    #[test]
    fn github_wire_names() {
        let claim = ClaimPayload::GitHubReputation(GitHubReputationClaim {
            id: "did:key:zQ3sabc".into(),
            username: "octocat".into(),
            profile_url: "https://github.com/octocat".into(),
            reputation: GitHubReputation {
                followers: 10,
                public_repos: 8,
                account_age: 4000,
            },
            verified_at: Timestamp::parse("2024-05-01T12:00:00Z").unwrap(),
        });
        let v = claim.to_subject().unwrap();
        assert_eq!(v["profileUrl"], "https://github.com/octocat");
        assert_eq!(v["reputation"]["publicRepos"], 8);
        assert_eq!(v["reputation"]["accountAge"], 4000);
        assert_eq!(v["verifiedAt"], "2024-05-01T12:00:00Z");
        let back = ClaimPayload::from_subject(ClaimKind::GitHubReputation, &v).unwrap();
        assert_eq!(back, claim);
    }

    #[test]
    fn kind_from_types() {
        let types = vec![
            VERIFIABLE_CREDENTIAL_TYPE.to_string(),
            GITHUB_CREDENTIAL_TYPE.to_string(),
        ];
        assert_eq!(ClaimKind::from_types(&types), Some(ClaimKind::GitHubReputation));
        assert_eq!(
            ClaimKind::from_types(&[VERIFIABLE_CREDENTIAL_TYPE.to_string()]),
            None
        );
    }

    #[test]
    fn from_subject_rejects_wrong_shape() {
        let err = ClaimPayload::from_subject(ClaimKind::Employment, &json!({"id": "x"}))
            .unwrap_err();
        assert!(matches!(err, VcError::MalformedCredential(_)));
    }

    #[test]
    fn set_subject_id_overwrites() {
        let mut claim = ClaimPayload::Employment(EmploymentClaim {
            id: String::new(),
            employer: "Acme".into(),
            role: "Engineer".into(),
            start_date: "2023-01-01".into(),
            end_date: Some("2024-01-01".into()),
        });
        claim.set_subject_id("did:ethr:polygon:0xabc");
        assert_eq!(claim.subject_id(), "did:ethr:polygon:0xabc");
    }
}
