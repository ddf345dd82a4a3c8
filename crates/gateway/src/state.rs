use std::sync::Arc;

use {
    visage_common::DisguisePolicy,
    visage_display::ResolutionChain,
    visage_registry::PluginRegistry,
};

/// Shared state behind every route.
pub struct AppState {
    pub registry: Arc<PluginRegistry>,
    pub chain: Arc<ResolutionChain>,
    /// Policy attached to a resolve request that asks for a disguised view.
    pub mask_policy: Arc<dyn DisguisePolicy>,
    /// Replay-protection token required by admin mutations. Rotates on every
    /// process start.
    pub sesskey: String,
}

impl AppState {
    pub fn new(
        registry: Arc<PluginRegistry>,
        chain: Arc<ResolutionChain>,
        mask_policy: Arc<dyn DisguisePolicy>,
    ) -> Self {
        Self {
            registry,
            chain,
            mask_policy,
            sesskey: generate_sesskey(),
        }
    }
}

fn generate_sesskey() -> String {
    use rand::RngCore;

    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sesskeys_are_unique_per_generation() {
        let a = generate_sesskey();
        let b = generate_sesskey();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
