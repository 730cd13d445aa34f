//! Theme registry
//!
//! The closed set of themes is registered once at startup and looked up by
//! [`ThemeKind`]. Looking up a kind that was never registered is a template
//! error rather than a panic.

use super::{Theme, ThemeKind};
use crate::error::FolioError;
use std::collections::HashMap;

/// Registry of presentation themes
///
/// # Examples
///
/// ```ignore
/// let registry = ThemeRegistry::with_defaults();
/// let theme = registry.get_named("technical")?;
/// assert_eq!(theme.kind(), ThemeKind::Technical);
/// ```
pub struct ThemeRegistry {
    themes: HashMap<ThemeKind, Box<dyn Theme>>,
}

impl ThemeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ThemeRegistry {
            themes: HashMap::new(),
        }
    }

    /// Register a theme
    ///
    /// If a theme of the same kind already exists, it will be replaced.
    pub fn register<T: Theme + 'static>(&mut self, theme: T) {
        self.themes.insert(theme.kind(), Box::new(theme));
    }

    /// Get a theme by kind
    pub fn get(&self, kind: ThemeKind) -> Result<&dyn Theme, FolioError> {
        self.themes
            .get(&kind)
            .map(|t| t.as_ref())
            .ok_or_else(|| FolioError::Template(kind.to_string()))
    }

    /// Get a theme by its identifier
    pub fn get_named(&self, name: &str) -> Result<&dyn Theme, FolioError> {
        self.get(name.parse()?)
    }

    /// Check if a theme is registered
    pub fn has(&self, kind: ThemeKind) -> bool {
        self.themes.contains_key(&kind)
    }

    /// List registered theme names (sorted)
    pub fn list_themes(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.themes.keys().map(|k| k.name()).collect();
        names.sort();
        names
    }

    /// Registered themes with their descriptions, sorted by name
    pub fn describe(&self) -> Vec<(&'static str, &str)> {
        let mut entries: Vec<_> = self
            .themes
            .values()
            .map(|t| (t.kind().name(), t.description()))
            .collect();
        entries.sort();
        entries
    }

    /// Create a registry with the built-in themes
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(super::professional::ProfessionalTheme);
        registry.register(super::technical::TechnicalTheme);
        registry.register(super::executive::ExecutiveTheme);

        registry
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Metadata;
    use crate::themes::{BrandingDefaults, Palette, PageWeights, ResolvedBranding};

    // Test theme
    struct TestTheme;
    impl Theme for TestTheme {
        fn kind(&self) -> ThemeKind {
            ThemeKind::Technical
        }
        fn description(&self) -> &str {
            "Test theme"
        }
        fn defaults(&self) -> BrandingDefaults {
            BrandingDefaults {
                client_name: "c",
                project_title: "t",
                palette: Palette {
                    primary: "#000",
                    secondary: "#fff",
                },
            }
        }
        fn weights(&self) -> PageWeights {
            PageWeights {
                start: 1.0,
                h1: 1.0,
                h2: 0.0,
            }
        }
        fn stylesheet(&self) -> &'static str {
            ""
        }
        fn cover_page(&self, _branding: &ResolvedBranding, _metadata: &Metadata) -> String {
            String::new()
        }
        fn header_template(&self, _branding: &ResolvedBranding) -> String {
            String::new()
        }
        fn footer_template(&self, _branding: &ResolvedBranding) -> String {
            String::new()
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = ThemeRegistry::new();
        assert_eq!(registry.themes.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = ThemeRegistry::new();
        registry.register(TestTheme);

        assert!(registry.has(ThemeKind::Technical));
        assert_eq!(registry.list_themes(), vec!["technical"]);
    }

    #[test]
    fn test_registry_get() {
        let mut registry = ThemeRegistry::new();
        registry.register(TestTheme);

        let theme = registry.get(ThemeKind::Technical);
        assert!(theme.is_ok());
        assert_eq!(theme.unwrap().description(), "Test theme");
    }

    #[test]
    fn test_registry_get_unregistered() {
        let registry = ThemeRegistry::new();
        let result = registry.get(ThemeKind::Executive);
        match result {
            Err(FolioError::Template(name)) => assert_eq!(name, "executive"),
            _ => panic!("Expected Template error"),
        }
    }

    #[test]
    fn test_registry_get_named_unknown() {
        let registry = ThemeRegistry::with_defaults();
        match registry.get_named("sparkly") {
            Err(FolioError::Template(name)) => assert_eq!(name, "sparkly"),
            _ => panic!("Expected Template error"),
        }
    }

    #[test]
    fn test_registry_replace_theme() {
        let mut registry = ThemeRegistry::new();
        registry.register(TestTheme);
        registry.register(TestTheme); // Replace

        assert_eq!(registry.list_themes().len(), 1);
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ThemeRegistry::with_defaults();
        assert_eq!(
            registry.list_themes(),
            vec!["executive", "professional", "technical"]
        );
        for kind in ThemeKind::ALL {
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_registry_describe() {
        let registry = ThemeRegistry::default();
        let described = registry.describe();
        assert_eq!(described.len(), 3);
        assert!(described.iter().all(|(_, d)| !d.is_empty()));
    }
}
