//! Authorization decision returned by the policy evaluators.
//!
//! The deny reason is for logs only. Every `Deny` maps to the same
//! "not authorized" response so callers cannot learn whether a resource
//! exists or who owns it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Route value is not a valid resource id.
    MalformedResourceId,
    /// Principal lacks a required claim.
    MissingClaim,
    /// Ownership lookup failed (transport, pool, query).
    LookupFailure,
    /// Lookup succeeded but the caller is not the owner.
    OwnershipMismatch,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedResourceId => "malformed_resource_id",
            Self::MissingClaim => "missing_claim",
            Self::LookupFailure => "lookup_failure",
            Self::OwnershipMismatch => "ownership_mismatch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}
