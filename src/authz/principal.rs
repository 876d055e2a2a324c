/*
 * Responsibility
 * - Principal: 1 リクエスト分の認証済み claim 集合
 * - Claim Extractor (get_claim) : claim type から値を取り出す
 * - JWT payload (JSON) → Vec<Claim> への変換
 *
 * Notes
 * - 同じ type の claim が複数ある場合は「最初の 1 件」を返す（token の並び順のまま）
 * - payload の並び順を保つため serde_json は preserve_order を有効にしている
 */
use serde_json::{Map, Value};

pub const SUBJECT_CLAIM: &str = "sub";

/// A single typed fact about the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// The authenticated caller's claims for one request.
///
/// Claims keep the order in which the token validator delivered them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    claims: Vec<Claim>,
}

impl Principal {
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }

    /// Build a principal from a validated JWT payload.
    ///
    /// - string → one claim
    /// - number / bool → one claim (JSON text)
    /// - array → one claim per element, in array order
    /// - object → one claim holding the compact JSON text (e.g. `address`)
    /// - null → skipped
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let mut claims = Vec::with_capacity(payload.len());

        for (claim_type, value) in payload {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(v) = scalar_text(item) {
                            claims.push(Claim::new(claim_type.as_str(), v));
                        }
                    }
                }
                other => {
                    if let Some(v) = scalar_text(other) {
                        claims.push(Claim::new(claim_type.as_str(), v));
                    }
                }
            }
        }

        Self::new(claims)
    }

    /// Returns the value of the first claim of `claim_type`, or `None` if absent.
    ///
    /// When several claims share a type, the first one in delivery order wins.
    pub fn get_claim(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    pub fn subject(&self) -> Option<&str> {
        self.get_claim(SUBJECT_CLAIM)
    }

    pub fn claims_of<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.claims
            .iter()
            .filter(move |c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.claims_of(claim_type).any(|v| v == value)
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        // numbers, bools, nested arrays/objects: keep their JSON text
        other => Some(other.to_string()),
    }
}
