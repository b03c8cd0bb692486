// ABOUTME: Message translation for labels, rule messages and notices
// ABOUTME: Identity translator by default, JSON catalogs keyed by category then message

use std::collections::HashMap;

/// Category for account-specific labels and messages
pub const CATEGORY_USER: &str = "user";

/// Category for generic rule messages
pub const CATEGORY_RULES: &str = "rules";

pub trait Translator: Send + Sync {
    fn translate(&self, category: &str, message: &str) -> String;
}

/// Returns every message unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct Untranslated;

impl Translator for Untranslated {
    fn translate(&self, _category: &str, message: &str) -> String {
        message.to_string()
    }
}

/// Translations loaded from a JSON document:
/// `{"user": {"Username": "Nom d'utilisateur"}, "rules": {...}}`
#[derive(Debug, Default, Clone)]
pub struct MessageCatalog {
    messages: HashMap<String, HashMap<String, String>>,
}

impl MessageCatalog {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let messages = serde_json::from_str(json)?;
        Ok(Self { messages })
    }
}

impl Translator for MessageCatalog {
    fn translate(&self, category: &str, message: &str) -> String {
        self.messages
            .get(category)
            .and_then(|messages| messages.get(message))
            .cloned()
            .unwrap_or_else(|| message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untranslated_passthrough() {
        assert_eq!(Untranslated.translate(CATEGORY_USER, "Email"), "Email");
    }

    #[test]
    fn test_catalog_lookup_and_fallback() {
        let catalog = MessageCatalog::from_json(
            r#"{"user": {"Username": "Nom d'utilisateur"}, "rules": {"{attribute} is invalid.": "{attribute} est invalide."}}"#,
        )
        .unwrap();

        assert_eq!(
            catalog.translate(CATEGORY_USER, "Username"),
            "Nom d'utilisateur"
        );
        assert_eq!(
            catalog.translate(CATEGORY_RULES, "{attribute} is invalid."),
            "{attribute} est invalide."
        );
        // Unknown message and unknown category fall back to the source text
        assert_eq!(catalog.translate(CATEGORY_USER, "Email"), "Email");
        assert_eq!(catalog.translate("other", "Username"), "Username");
    }

    #[test]
    fn test_catalog_rejects_malformed_json() {
        assert!(MessageCatalog::from_json("[1, 2]").is_err());
    }
}
