use serde::{Deserialize, Serialize};

/// Strip color theme selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Dark,
    Light,
}

impl Default for ThemeKind {
    fn default() -> Self {
        ThemeKind::Dark
    }
}

/// Resolved color tones for a strip theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: [u8; 4],
    pub text: [u8; 4],
    pub border: [u8; 4],
    pub shadow: [u8; 4],
}

impl ThemeKind {
    pub fn colors(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme {
                background: [0x22, 0x22, 0x22, 255],
                text: [0x99, 0x99, 0x99, 255],
                border: [0x33, 0x33, 0x33, 255],
                shadow: [0, 0, 0, 51],
            },
            ThemeKind::Light => Theme {
                background: [0xf5, 0xf5, 0xf5, 255],
                text: [0x66, 0x66, 0x66, 255],
                border: [0xe0, 0xe0, 0xe0, 255],
                shadow: [0, 0, 0, 26],
            },
        }
    }
}
