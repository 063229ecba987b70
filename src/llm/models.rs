//! Centralized model definitions
//!
//! The selectable models are a fixed, small mapping known at configuration
//! time: a display label paired with the primary-provider identifier it
//! resolves to. The fallback model is not selectable; it is only reached
//! through the unavailability path in the generator.

/// Sampling temperature used for every provider call, primary and fallback.
pub const SAMPLING_TEMPERATURE: f32 = 0.7;

/// Model id sent to the secondary provider on the fallback path.
pub const FALLBACK_MODEL_ID: &str = "gpt-5.2";

/// Label selected when no developer override is active.
pub const DEFAULT_MODEL_LABEL: &str = "gemini-3-pro-preview";

/// System instruction used when no developer override is active.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Business Planning Assistant";

/// A selectable model definition
#[derive(Debug, Clone, Copy)]
pub struct ModelDef {
    /// User-facing display label
    pub label: &'static str,
    /// Identifier passed to the primary provider
    pub primary_id: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

/// Get all selectable model definitions
pub fn all_models() -> &'static [ModelDef] {
    &[
        ModelDef {
            label: "gemini-3-pro-preview",
            primary_id: "gemini-3-pro-preview",
            description: "Gemini 3 Pro preview (default)",
        },
        ModelDef {
            label: "ChatGPT 5.2",
            primary_id: "gpt-5.2-thinking",
            description: "GPT 5.2 thinking profile",
        },
    ]
}

/// Resolve a display label to its definition. Callers at the HTTP boundary
/// must validate labels up front; everything past that boundary treats an
/// unknown label as a programming error.
pub fn resolve(label: &str) -> Option<&'static ModelDef> {
    all_models().iter().find(|m| m.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_label_resolves() {
        let def = resolve(DEFAULT_MODEL_LABEL).expect("default label must be in the mapping");
        assert_eq!(def.primary_id, "gemini-3-pro-preview");
    }

    #[test]
    fn labels_are_unique() {
        let models = all_models();
        for (i, a) in models.iter().enumerate() {
            for b in &models[i + 1..] {
                assert_ne!(a.label, b.label);
            }
        }
    }

    #[test]
    fn unknown_label_is_none() {
        assert!(resolve("claude-4.5-sonnet").is_none());
        assert!(resolve("").is_none());
    }
}
