//! Rendering configuration
//!
//! Plain configuration values passed to renderers and the descriptor adapter.
//! Resolving command-line overrides into these values is the caller's job.

use super::Visibility;

/// Placeholder emitted for members whose type was left unspecified
pub const DEFAULT_PLACEHOLDER_TYPE: &str = "TYPE";

/// Configuration for the source renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Spaces per indentation level
    pub indent_width: usize,
    /// Type written for fields and properties without a declared type
    pub placeholder_type: String,
}

impl SourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_placeholder_type(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder_type = placeholder.into();
        self
    }

    pub(crate) fn indent(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            placeholder_type: DEFAULT_PLACEHOLDER_TYPE.to_string(),
        }
    }
}

/// Minimum visibility per member kind
///
/// A member is kept when its visibility is at least as open as the floor for
/// its kind. The default keeps public members only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberFilter {
    pub methods: Visibility,
    pub fields: Visibility,
    pub properties: Visibility,
}

impl MemberFilter {
    pub fn new(methods: Visibility, fields: Visibility, properties: Visibility) -> Self {
        Self {
            methods,
            fields,
            properties,
        }
    }

    /// Keep every member regardless of visibility
    pub fn all() -> Self {
        Self::uniform(Visibility::Private)
    }

    /// Keep public members only
    pub fn public_only() -> Self {
        Self::uniform(Visibility::Public)
    }

    pub fn uniform(floor: Visibility) -> Self {
        Self::new(floor, floor, floor)
    }
}

impl Default for MemberFilter {
    fn default() -> Self {
        Self::public_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_config_builder() {
        let config = SourceConfig::new()
            .with_indent_width(2)
            .with_placeholder_type("object");
        assert_eq!(config.indent(), "  ");
        assert_eq!(config.placeholder_type, "object");
    }

    #[test]
    fn test_source_config_default() {
        let config = SourceConfig::default();
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.placeholder_type, "TYPE");
    }

    #[test]
    fn test_member_filter_presets() {
        assert_eq!(MemberFilter::default(), MemberFilter::public_only());
        assert_eq!(MemberFilter::all().methods, Visibility::Private);
        let mixed = MemberFilter::new(
            Visibility::Protected,
            Visibility::Public,
            Visibility::Internal,
        );
        assert_eq!(mixed.fields, Visibility::Public);
    }
}
