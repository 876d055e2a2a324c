/*
 * Responsibility
 * - Ownership Policy Evaluator: route の id と Principal から Allow/Deny を決める
 * - 所有者の参照は OwnershipLookup (外部: DB) に委譲する。ここでは読むだけ
 *
 * Gates (short-circuit, fail-closed)
 *  1. id を UUID として parse できない → Deny
 *  2. sub claim がない → Deny
 *  3. lookup が false / Err → Deny, true → Allow
 */
use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authz::decision::{Decision, DenyReason};
use crate::authz::principal::Principal;
use crate::repos::error::RepoError;

/// Identifier of an owned image (Resource Reference).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub Uuid);

impl ImageId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for ImageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Read-only ownership capability backed by the datastore.
///
/// Implementations must be safe for concurrent use. Any `Err` is treated as
/// "not the owner" by the evaluator.
#[async_trait]
pub trait OwnershipLookup: Send + Sync {
    async fn is_owner(&self, image_id: ImageId, subject: &str) -> Result<bool, RepoError>;
}

#[derive(Clone)]
pub struct OwnershipPolicy {
    lookup: Arc<dyn OwnershipLookup>,
}

impl fmt::Debug for OwnershipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnershipPolicy").finish_non_exhaustive()
    }
}

impl OwnershipPolicy {
    pub fn new(lookup: Arc<dyn OwnershipLookup>) -> Self {
        Self { lookup }
    }

    pub async fn evaluate(&self, resource_id_text: &str, principal: &Principal) -> Decision {
        let Ok(image_id) = resource_id_text.parse::<ImageId>() else {
            return Decision::Deny(DenyReason::MalformedResourceId);
        };

        let Some(subject) = principal.subject() else {
            return Decision::Deny(DenyReason::MissingClaim);
        };

        match self.lookup.is_owner(image_id, subject).await {
            Ok(true) => Decision::Allow,
            Ok(false) => Decision::Deny(DenyReason::OwnershipMismatch),
            Err(err) => {
                tracing::warn!(error = ?err, %image_id, "ownership lookup failed");
                Decision::Deny(DenyReason::LookupFailure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::principal::Claim;
    use crate::testing::StubOwnership;

    const IMAGE: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn principal_with_sub(sub: &str) -> Principal {
        Principal::new(vec![Claim::new("sub", sub)])
    }

    fn policy(stub: &Arc<StubOwnership>) -> OwnershipPolicy {
        OwnershipPolicy::new(stub.clone())
    }

    #[tokio::test]
    async fn malformed_id_is_denied_without_lookup() {
        let stub = Arc::new(StubOwnership::default().with_owner(IMAGE, "user-42"));
        let p = policy(&stub);

        for raw in ["not-a-guid", "", "3fa85f64-5717-4562-b3fc", "12345", " "] {
            let decision = p.evaluate(raw, &principal_with_sub("user-42")).await;
            assert_eq!(decision, Decision::Deny(DenyReason::MalformedResourceId));
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn principal_without_claims_is_denied() {
        let stub = Arc::new(StubOwnership::default().with_owner(IMAGE, "user-42"));

        let decision = policy(&stub).evaluate(IMAGE, &Principal::default()).await;

        assert_eq!(decision, Decision::Deny(DenyReason::MissingClaim));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn principal_without_sub_is_denied() {
        let stub = Arc::new(StubOwnership::default().with_owner(IMAGE, "user-42"));
        let principal = Principal::new(vec![Claim::new("role", "PayingUser")]);

        let decision = policy(&stub).evaluate(IMAGE, &principal).await;

        assert_eq!(decision, Decision::Deny(DenyReason::MissingClaim));
    }

    #[tokio::test]
    async fn owner_is_allowed() {
        let stub = Arc::new(StubOwnership::default().with_owner(IMAGE, "user-42"));

        let decision = policy(&stub)
            .evaluate(IMAGE, &principal_with_sub("user-42"))
            .await;

        assert_eq!(decision, Decision::Allow);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn non_owner_is_denied() {
        let stub = Arc::new(StubOwnership::default().with_owner(IMAGE, "user-42"));

        let decision = policy(&stub)
            .evaluate(IMAGE, &principal_with_sub("user-99"))
            .await;

        assert_eq!(decision, Decision::Deny(DenyReason::OwnershipMismatch));
    }

    #[tokio::test]
    async fn unknown_image_is_denied() {
        let stub = Arc::new(StubOwnership::default());

        let decision = policy(&stub)
            .evaluate(IMAGE, &principal_with_sub("user-42"))
            .await;

        assert_eq!(decision, Decision::Deny(DenyReason::OwnershipMismatch));
    }

    #[tokio::test]
    async fn lookup_error_is_denied() {
        let stub = Arc::new(
            StubOwnership::default()
                .with_owner(IMAGE, "user-42")
                .failing(),
        );

        let decision = policy(&stub)
            .evaluate(IMAGE, &principal_with_sub("user-42"))
            .await;

        assert_eq!(decision, Decision::Deny(DenyReason::LookupFailure));
    }

    #[tokio::test]
    async fn first_sub_claim_is_used() {
        let stub = Arc::new(StubOwnership::default().with_owner(IMAGE, "user-42"));
        let principal = Principal::new(vec![
            Claim::new("sub", "user-99"),
            Claim::new("sub", "user-42"),
        ]);

        let decision = policy(&stub).evaluate(IMAGE, &principal).await;

        assert_eq!(decision, Decision::Deny(DenyReason::OwnershipMismatch));
    }

    #[tokio::test]
    async fn repeated_evaluation_is_stable() {
        let stub = Arc::new(StubOwnership::default().with_owner(IMAGE, "user-42"));
        let p = policy(&stub);
        let owner = principal_with_sub("user-42");
        let other = principal_with_sub("user-99");

        for _ in 0..3 {
            assert_eq!(p.evaluate(IMAGE, &owner).await, Decision::Allow);
            assert_eq!(
                p.evaluate(IMAGE, &other).await,
                Decision::Deny(DenyReason::OwnershipMismatch)
            );
        }
    }

    #[test]
    fn image_id_accepts_canonical_uuid_forms() {
        let hyphenated: ImageId = IMAGE.parse().unwrap();
        let simple: ImageId = "3fa85f6457174562b3fc2c963f66afa6".parse().unwrap();
        assert_eq!(hyphenated, simple);
        assert_eq!(hyphenated.to_string(), IMAGE);
    }
}
