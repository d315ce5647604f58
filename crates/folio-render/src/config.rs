//! Render configuration.

use serde::Deserialize;

use folio_components::{ClassNames, ImageConfig};

use crate::highlight::ThemePair;

/// Settings shared by every render, read from `folio.toml`.
///
/// ```toml
/// site_host = "example.com"
///
/// [themes]
/// light = "InspiredGitHub"
/// dark = "base16-ocean.dark"
///
/// [classes]
/// code = "code"
/// pre = "pre"
/// image = "rounded-lg"
///
/// [images]
/// endpoint = "/_image"
/// widths = [640, 1080, 1920]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Links to this host are treated as internal
    pub site_host: Option<String>,

    /// Code highlighting themes
    pub themes: ThemePair,

    /// Style classes of the default components
    pub classes: ClassNames,

    /// Image optimization endpoint
    pub images: ImageConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_uses_defaults() {
        let config: RenderConfig = toml::from_str("").unwrap();

        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.themes.light, "InspiredGitHub");
        assert_eq!(config.classes.image, "rounded-lg");
        assert_eq!(config.images.endpoint, "/_image");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: RenderConfig = toml::from_str(
            r#"
site_host = "example.com"

[themes]
dark = "Solarized (dark)"

[images]
widths = [320, 640]
"#,
        )
        .unwrap();

        assert_eq!(config.site_host.as_deref(), Some("example.com"));
        assert_eq!(config.themes.light, "InspiredGitHub");
        assert_eq!(config.themes.dark, "Solarized (dark)");
        assert_eq!(config.images.widths, vec![320, 640]);
        assert_eq!(config.images.quality, 75);
    }
}
