use serde::Deserialize;

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndicatorsConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub mode: ModeConfig,
    #[serde(default)]
    pub scratchpad: ScratchpadConfig,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeneralConfig {
    /// Report failures of closing the sway socket on stderr.
    #[serde(default)]
    pub print_close_errors: bool,
}

fn default_active_glyph() -> String {
    // Powerline arrow, rendered by waybar.
    "\u{e0b0}".to_string()
}

fn default_occupied_glyph() -> String {
    "\u{f2d2}".to_string()
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModeConfig {
    #[serde(default)]
    pub default_glyph: String,
    #[serde(default = "default_active_glyph")]
    pub active_glyph: String,
}

impl Default for ModeConfig {
    fn default() -> Self {
        ModeConfig {
            default_glyph: String::new(),
            active_glyph: default_active_glyph(),
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScratchpadConfig {
    #[serde(default)]
    pub empty_glyph: String,
    #[serde(default = "default_occupied_glyph")]
    pub occupied_glyph: String,
}

impl Default for ScratchpadConfig {
    fn default() -> Self {
        ScratchpadConfig {
            empty_glyph: String::new(),
            occupied_glyph: default_occupied_glyph(),
        }
    }
}
