use uuid::Uuid;

/// The two opaque identifiers the upstream service expects from an anonymous
/// caller. Not a security credential, just a request-shaping token; the
/// upstream invalidates them at will, so callers regenerate rather than
/// persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub anonymous_user_id: String,
    pub client_id: String,
}

impl CredentialPair {
    /// Generates a fresh pair of independent 128-bit identifiers in
    /// canonical UUID form. Collision probability is treated as zero.
    pub fn generate() -> Self {
        CredentialPair {
            anonymous_user_id: Uuid::new_v4().to_string(),
            client_id: Uuid::new_v4().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_produces_canonical_uuids() {
        let pair = CredentialPair::generate();
        assert!(Uuid::parse_str(&pair.anonymous_user_id).is_ok());
        assert!(Uuid::parse_str(&pair.client_id).is_ok());
    }

    #[test]
    fn test_generate_produces_independent_ids() {
        let pair = CredentialPair::generate();
        assert_ne!(pair.anonymous_user_id, pair.client_id);

        let other = CredentialPair::generate();
        assert_ne!(pair, other);
    }
}
