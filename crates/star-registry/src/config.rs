//! Registry configuration.

use std::time::Duration;

/// Default challenge validity window.
pub const DEFAULT_CHALLENGE_WINDOW: Duration = Duration::from_secs(300);

/// Default protocol tag appended to challenge messages.
pub const DEFAULT_PROTOCOL_TAG: &str = "starRegistry";

/// Configuration for the registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How long a challenge stays valid. A claim is accepted while
    /// `now - issued_at < challenge_window`.
    pub challenge_window: Duration,
    /// Tag that closes every challenge message.
    pub protocol_tag: String,
    /// Whether audits recompute the genesis digest too.
    pub audit_genesis_digest: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            challenge_window: DEFAULT_CHALLENGE_WINDOW,
            protocol_tag: DEFAULT_PROTOCOL_TAG.to_string(),
            audit_genesis_digest: true,
        }
    }
}

impl RegistryConfig {
    /// Set the challenge window.
    pub fn with_challenge_window(mut self, window: Duration) -> Self {
        self.challenge_window = window;
        self
    }

    /// Set the protocol tag.
    pub fn with_protocol_tag(mut self, tag: impl Into<String>) -> Self {
        self.protocol_tag = tag.into();
        self
    }

    /// Enable or disable genesis digest recomputation in audits.
    pub fn with_audit_genesis_digest(mut self, enabled: bool) -> Self {
        self.audit_genesis_digest = enabled;
        self
    }

    /// The challenge window in whole seconds, rounded up.
    ///
    /// Challenge times have one-second resolution, so a sub-second window
    /// still admits a claim answered within the second it was issued.
    pub fn window_secs(&self) -> u64 {
        let secs = self.challenge_window.as_secs();
        if self.challenge_window.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        }
    }
}
