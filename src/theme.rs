//! Theme colors for the UI
//! Optionally overridden by ~/.config/linepad/theme.conf (kitty-style `key #hex` lines)

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // Active borders, highlights
    pub info: Color,        // Info banners
    pub success: Color,     // Success banners, accepted drafts
    pub danger: Color,      // Error banners
    pub text: Color,        // Primary text
    pub text_dim: Color,    // Dimmed text, hints
    pub bg: Color,          // Background (fade target)
    pub bg_selected: Color, // Selection background
    pub inactive: Color,    // Inactive borders
    pub header: Color,      // Table headers, field titles
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired fallback palette
        Self {
            accent: Color::Rgb(250, 179, 135),
            info: Color::Rgb(137, 180, 250),
            success: Color::Rgb(166, 218, 149),
            danger: Color::Rgb(243, 139, 168),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg: Color::Rgb(30, 30, 46),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(243, 139, 168),
        }
    }
}

impl Theme {
    /// Load theme overrides from the user config directory
    pub fn load() -> Self {
        if let Some(theme) = Self::load_user_theme() {
            return theme;
        }

        Self::default()
    }

    /// Load colors from a kitty-style conf file next to the app config
    fn load_user_theme() -> Option<Self> {
        let theme_path = dirs::config_dir()?.join("linepad/theme.conf");

        let content = fs::read_to_string(&theme_path).ok()?;
        let colors = Self::parse_color_conf(&content);

        if colors.is_empty() {
            return None;
        }

        let fallback = Self::default();
        let pick = |key: &str, fallback: Color| colors.get(key).copied().unwrap_or(fallback);

        Some(Self {
            accent: pick("accent", fallback.accent),
            info: pick("info", fallback.info),
            success: pick("success", fallback.success),
            danger: pick("danger", fallback.danger),
            text: pick("foreground", fallback.text),
            text_dim: pick("dim", fallback.text_dim),
            bg: pick("background", fallback.bg),
            bg_selected: pick("selection_background", fallback.bg_selected),
            inactive: pick("inactive", fallback.inactive),
            header: pick("header", fallback.header),
        })
    }

    /// Parse `key value` lines where value is a hex color
    fn parse_color_conf(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.splitn(2, char::is_whitespace).collect();
            if parts.len() == 2 {
                let key = parts[0].trim();
                let value = parts[1].trim();

                if let Some(color) = Self::parse_hex_color(value) {
                    colors.insert(key.to_string(), color);
                }
            }
        }

        colors
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

/// Blend `from` toward `to` by `t` (0.0 = from, 1.0 = to). This is the
/// terminal's stand-in for opacity: fading banners are drawn with their
/// color pushed toward the background.
pub fn fade(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb(lerp(r1, r2), lerp(g1, g2), lerp(b1, b2))
        }
        // Indexed colors can't be blended; snap at the far end
        _ => {
            if t < 1.0 {
                from
            } else {
                to
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(
            Theme::parse_hex_color("#ffc107"),
            Some(Color::Rgb(255, 193, 7))
        );
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_conf_parsing_skips_comments() {
        let conf = "# a comment\naccent #ffc107\n\nbad-line\nbackground #121212\n";
        let colors = Theme::parse_color_conf(conf);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors.get("accent"), Some(&Color::Rgb(255, 193, 7)));
    }

    #[test]
    fn test_fade_endpoints_and_midpoint() {
        let from = Color::Rgb(200, 100, 0);
        let to = Color::Rgb(0, 100, 200);

        assert_eq!(fade(from, to, 0.0), from);
        assert_eq!(fade(from, to, 1.0), to);
        assert_eq!(fade(from, to, 0.5), Color::Rgb(100, 100, 100));

        // Out-of-range progress clamps instead of overshooting
        assert_eq!(fade(from, to, 2.0), to);
    }
}
