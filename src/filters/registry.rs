use std::collections::HashMap;

use crate::filters::{CrosshatchEffect, FisheyeEffect, GlitchEffect, PixelEffect};

/// A single filter's definition
///
/// Cheap filters carry a CSS-style compositing expression; pixel effects
/// carry `"none"` there and are dispatched to a registered processor
/// instead.
#[derive(Debug, Clone)]
pub struct FilterDefinition {
    pub css_expression: String,
    pub is_pixel_effect: bool,
    pub display_name: Option<String>,
}

impl FilterDefinition {
    fn css<S: Into<String>>(expression: S, display_name: &str) -> Self {
        Self {
            css_expression: expression.into(),
            is_pixel_effect: false,
            display_name: Some(display_name.to_string()),
        }
    }

    fn pixel(display_name: &str) -> Self {
        Self {
            css_expression: "none".to_string(),
            is_pixel_effect: true,
            display_name: Some(display_name.to_string()),
        }
    }
}

/// Registry of available filters
///
/// Built once at startup and passed by reference to consumers; lookups for
/// unknown identifiers degrade to a visual no-op rather than failing the
/// render path.
pub struct FilterRegistry {
    definitions: HashMap<String, FilterDefinition>,
    processors: HashMap<String, Box<dyn PixelEffect>>,
}

impl FilterRegistry {
    /// Create a new registry with all built-in filters
    pub fn new() -> Self {
        let mut registry = Self {
            definitions: HashMap::new(),
            processors: HashMap::new(),
        };
        registry.register_builtin_filters();
        registry
    }

    fn register_builtin_filters(&mut self) {
        let defs = [
            ("none", FilterDefinition::css("none", "Normal")),
            ("grayscale", FilterDefinition::css("grayscale(100%)", "Grayscale")),
            ("sepia", FilterDefinition::css("sepia(100%)", "Sepia")),
            ("invert", FilterDefinition::css("invert(100%)", "Invert")),
            ("blur", FilterDefinition::css("blur(3px)", "Blur")),
            ("brightness", FilterDefinition::css("brightness(150%)", "Brightness")),
            ("contrast", FilterDefinition::css("contrast(200%)", "Contrast")),
            ("hueRotate", FilterDefinition::css("hue-rotate(90deg)", "Hue Rotate")),
            ("saturate", FilterDefinition::css("saturate(200%)", "Saturate")),
            (
                "vintage",
                FilterDefinition::css("sepia(50%) contrast(120%) brightness(90%)", "Vintage"),
            ),
            (
                "coldBlue",
                FilterDefinition::css("saturate(150%) hue-rotate(180deg)", "Cold Blue"),
            ),
            (
                "warmOrange",
                FilterDefinition::css("sepia(30%) saturate(140%) hue-rotate(20deg)", "Warm Orange"),
            ),
            (
                "nineties",
                FilterDefinition::css(
                    "contrast(110%) brightness(110%) saturate(130%) sepia(30%)",
                    "90's",
                ),
            ),
            (
                "twoThousands",
                FilterDefinition::css(
                    "contrast(90%) brightness(120%) saturate(85%) hue-rotate(-10deg)",
                    "2000's",
                ),
            ),
            (
                "noir",
                FilterDefinition::css("grayscale(100%) contrast(150%) brightness(80%)", "Noir"),
            ),
            (
                "rainbow",
                FilterDefinition::css("saturate(200%) hue-rotate(360deg)", "Rainbow"),
            ),
            ("fisheye", FilterDefinition::pixel("Fisheye")),
            ("glitch", FilterDefinition::pixel("Glitch")),
            ("crosshatch", FilterDefinition::pixel("Crosshatch")),
        ];
        for (key, def) in defs {
            self.definitions.insert(key.to_string(), def);
        }

        self.processors
            .insert("fisheye".to_string(), Box::new(FisheyeEffect::new()));
        self.processors
            .insert("glitch".to_string(), Box::new(GlitchEffect::new()));
        self.processors
            .insert("crosshatch".to_string(), Box::new(CrosshatchEffect::new()));
    }

    /// Register a custom filter definition, with an optional processor for
    /// pixel effects
    pub fn register(
        &mut self,
        key: String,
        definition: FilterDefinition,
        processor: Option<Box<dyn PixelEffect>>,
    ) {
        if let Some(processor) = processor {
            self.processors.insert(key.clone(), processor);
        }
        self.definitions.insert(key, definition);
    }

    /// Get a filter's definition, if registered
    pub fn definition(&self, key: &str) -> Option<&FilterDefinition> {
        self.definitions.get(key)
    }

    /// CSS expression for a filter; `"none"` for unknown identifiers
    pub fn css_expression(&self, key: &str) -> &str {
        self.definitions
            .get(key)
            .map(|d| d.css_expression.as_str())
            .unwrap_or("none")
    }

    /// Whether a filter needs per-pixel processing; false for unknown
    /// identifiers (fail-safe passthrough)
    pub fn is_pixel_effect(&self, key: &str) -> bool {
        self.definitions
            .get(key)
            .map(|d| d.is_pixel_effect)
            .unwrap_or(false)
    }

    /// Display name for a filter, falling back to a formatted identifier
    pub fn display_name(&self, key: &str) -> String {
        self.definitions
            .get(key)
            .and_then(|d| d.display_name.clone())
            .unwrap_or_else(|| format_filter_name(key))
    }

    /// Get the processor for a pixel effect, if one is registered
    pub fn processor(&self, key: &str) -> Option<&dyn PixelEffect> {
        self.processors.get(key).map(|p| p.as_ref())
    }

    /// All filter identifiers requiring per-pixel processing
    pub fn special_filters(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .definitions
            .iter()
            .filter(|(_, d)| d.is_pixel_effect)
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// All filter identifiers applied as cheap compositing expressions
    pub fn normal_filters(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .definitions
            .iter()
            .filter(|(_, d)| !d.is_pixel_effect)
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// All registered filter identifiers
    pub fn available_filters(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.definitions.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Check if a filter is registered
    pub fn has_filter(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    /// Get the number of registered filters
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a camelCase filter key into a readable name
///
/// `"hueRotate"` becomes `"Hue Rotate"`.
pub fn format_filter_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            name.extend(ch.to_uppercase());
        } else {
            if ch.is_ascii_uppercase() {
                name.push(' ');
            }
            name.push(ch);
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_filters_available() {
        let registry = FilterRegistry::new();

        assert!(registry.has_filter("none"));
        assert!(registry.has_filter("sepia"));
        assert!(registry.has_filter("fisheye"));
        assert!(registry.has_filter("glitch"));
        assert!(registry.has_filter("crosshatch"));

        assert_eq!(registry.len(), 19);
    }

    #[test]
    fn test_unknown_filter_fallbacks() {
        let registry = FilterRegistry::new();

        assert_eq!(registry.css_expression("unknown-id"), "none");
        assert!(!registry.is_pixel_effect("unknown-id"));
        assert!(registry.processor("unknown-id").is_none());
    }

    #[test]
    fn test_pixel_effects_match_processors() {
        let registry = FilterRegistry::new();

        for key in registry.special_filters() {
            assert!(
                registry.processor(&key).is_some(),
                "pixel effect {key} has no processor"
            );
            assert_eq!(registry.css_expression(&key), "none");
        }
        assert_eq!(registry.special_filters(), vec!["crosshatch", "fisheye", "glitch"]);
    }

    #[test]
    fn test_normal_filters_have_no_processor() {
        let registry = FilterRegistry::new();
        for key in registry.normal_filters() {
            assert!(registry.processor(&key).is_none());
        }
        assert_eq!(registry.normal_filters().len(), 16);
    }

    #[test]
    fn test_display_names() {
        let registry = FilterRegistry::new();
        assert_eq!(registry.display_name("none"), "Normal");
        assert_eq!(registry.display_name("hueRotate"), "Hue Rotate");
        // unregistered keys fall back to the formatter
        assert_eq!(registry.display_name("myCoolFilter"), "My Cool Filter");
    }

    #[test]
    fn test_format_filter_name() {
        assert_eq!(format_filter_name("sepia"), "Sepia");
        assert_eq!(format_filter_name("coldBlue"), "Cold Blue");
        assert_eq!(format_filter_name("twoThousands"), "Two Thousands");
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = FilterRegistry::new();
        registry.register(
            "pencil".to_string(),
            FilterDefinition::pixel("Pencil"),
            Some(Box::new(CrosshatchEffect::new())),
        );

        assert!(registry.has_filter("pencil"));
        assert!(registry.is_pixel_effect("pencil"));
        assert!(registry.processor("pencil").is_some());
        assert_eq!(registry.len(), 20);
    }
}
