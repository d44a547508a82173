/// Runtime configuration for token issuance and verification.
///
/// Built once at startup from the process environment and injected into
/// the signer and verifier; business code never reads ambient state.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared HMAC secret used for both signing and verification.
    pub secret: String,
    /// Lifetime of issued tokens in seconds.
    pub ttl_seconds: i64,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
}

impl TokenConfig {
    /// Construct config with sensible defaults (30 second leeway).
    pub fn new(secret: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
            leeway_seconds: 30,
        }
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}
