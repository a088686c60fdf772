//! Produce safe-to-display config snapshots.

use crate::schema::CoachConfig;

/// Mask a secret, keeping a short prefix as a hint.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() > 8 {
        let hint: String = secret.chars().take(4).collect();
        format!("{hint}***")
    } else {
        "***".to_string()
    }
}

/// A copy of `config` with credentials masked.
pub fn redacted(config: &CoachConfig) -> CoachConfig {
    let mut out = config.clone();
    out.agent.api_key = out.agent.api_key.as_deref().map(mask_secret);
    out
}
