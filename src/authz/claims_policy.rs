//! Claims-based policies (role / subscription checks).
//!
//! A policy is a list of requirements that must all be met. A requirement is
//! met when the principal carries at least one claim of the given type whose
//! value is in the allow-list (any value when the list is empty).

use crate::authz::decision::{Decision, DenyReason};
use crate::authz::principal::Principal;

#[derive(Debug, Clone)]
pub struct ClaimRequirement {
    pub claim_type: String,
    pub allowed_values: Vec<String>,
}

impl ClaimRequirement {
    pub fn new<I, S>(claim_type: impl Into<String>, allowed_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            claim_type: claim_type.into(),
            allowed_values: allowed_values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_met_by(&self, principal: &Principal) -> bool {
        if self.allowed_values.is_empty() {
            return principal.claims_of(&self.claim_type).next().is_some();
        }
        self.allowed_values
            .iter()
            .any(|allowed| principal.has_claim(&self.claim_type, allowed))
    }
}

#[derive(Debug, Clone)]
pub struct ClaimsPolicy {
    pub name: &'static str,
    pub requirements: Vec<ClaimRequirement>,
}

impl ClaimsPolicy {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            requirements: Vec::new(),
        }
    }

    pub fn require_claim<I, S>(mut self, claim_type: impl Into<String>, allowed_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements
            .push(ClaimRequirement::new(claim_type, allowed_values));
        self
    }

    pub fn require_role(self, role: &str) -> Self {
        self.require_claim("role", [role])
    }

    pub fn evaluate(&self, principal: &Principal) -> Decision {
        if self.requirements.iter().all(|r| r.is_met_by(principal)) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::MissingClaim)
        }
    }

    /// Image uploads are limited to paying users.
    pub fn paying_user() -> Self {
        Self::new("PayingUser").require_role("PayingUser")
    }

    /// Framing is offered to paying users living in Belgium.
    pub fn can_order_frame() -> Self {
        Self::new("CanOrderFrame")
            .require_claim("country", ["be"])
            .require_claim("subscriptionlevel", ["PayingUser"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::principal::Claim;

    fn principal(claims: &[(&str, &str)]) -> Principal {
        Principal::new(claims.iter().map(|(t, v)| Claim::new(*t, *v)).collect())
    }

    const DENIED: Decision = Decision::Deny(DenyReason::MissingClaim);

    #[test]
    fn paying_user_requires_role() {
        let policy = ClaimsPolicy::paying_user();

        assert_eq!(policy.evaluate(&principal(&[("role", "PayingUser")])), Decision::Allow);
        assert_eq!(policy.evaluate(&principal(&[("role", "FreeUser")])), DENIED);
        assert_eq!(policy.evaluate(&Principal::default()), DENIED);
    }

    #[test]
    fn any_of_multiple_role_claims_satisfies() {
        let p = principal(&[("role", "FreeUser"), ("role", "PayingUser")]);
        assert_eq!(ClaimsPolicy::paying_user().evaluate(&p), Decision::Allow);
    }

    #[test]
    fn can_order_frame_requires_all_requirements() {
        let policy = ClaimsPolicy::can_order_frame();

        let both = principal(&[("country", "be"), ("subscriptionlevel", "PayingUser")]);
        let wrong_country = principal(&[("country", "nl"), ("subscriptionlevel", "PayingUser")]);
        let free = principal(&[("country", "be"), ("subscriptionlevel", "FreeUser")]);

        assert_eq!(policy.evaluate(&both), Decision::Allow);
        assert_eq!(policy.evaluate(&wrong_country), DENIED);
        assert_eq!(policy.evaluate(&free), DENIED);
    }

    #[test]
    fn empty_allow_list_only_requires_presence() {
        let policy = ClaimsPolicy::new("HasEmail").require_claim("email", Vec::<String>::new());

        assert_eq!(policy.evaluate(&principal(&[("email", "a@b.c")])), Decision::Allow);
        assert_eq!(policy.evaluate(&principal(&[("sub", "x")])), DENIED);
    }

    #[test]
    fn policy_without_requirements_allows() {
        let policy = ClaimsPolicy::new("Authenticated");
        assert_eq!(policy.evaluate(&Principal::default()), Decision::Allow);
    }
}
