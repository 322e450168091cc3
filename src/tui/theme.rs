//! Per-site color tokens for the chat widget.

use ratatui::style::Color;

use crate::models::Site;

/// Colors that vary between subdomains. Everything else is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Header bar, focused borders, quick-action chips
    pub accent: Color,
    /// Visitor message cards
    pub accent_soft: Color,
    /// Header and status bar background
    pub surface: Color,
    /// Text drawn on `accent`/`surface`
    pub on_surface: Color,
}

const LUXURY_GOLD: Color = Color::Rgb(0xD4, 0xAF, 0x37);
const GOLD_LIGHT: Color = Color::Rgb(0xF5, 0xD7, 0x6E);
const PLATINUM: Color = Color::Rgb(0xE3, 0xE3, 0xE3);
const CHARCOAL: Color = Color::Rgb(0x1A, 0x1A, 0x1A);

impl Theme {
    pub fn for_site(site: Site) -> Self {
        match site {
            Site::AboutFace => Theme {
                accent: Color::Rgb(0x8B, 0x5C, 0xF6),
                accent_soft: Color::Rgb(0xC4, 0xB5, 0xFD),
                surface: Color::Rgb(0x6D, 0x28, 0xD9),
                on_surface: Color::White,
            },
            Site::Implants => Theme {
                accent: LUXURY_GOLD,
                accent_soft: GOLD_LIGHT,
                surface: CHARCOAL,
                on_surface: PLATINUM,
            },
            Site::Robotic => Theme {
                accent: Color::Rgb(0xFF, 0xD7, 0x00),
                accent_soft: PLATINUM,
                surface: Color::Black,
                on_surface: Color::White,
            },
            Site::MedSpa => Theme {
                accent: Color::Rgb(0xB7, 0x6E, 0x79),
                accent_soft: Color::Rgb(0xF4, 0xC2, 0xC2),
                surface: CHARCOAL,
                on_surface: Color::White,
            },
            Site::Tmj => Theme {
                accent: Color::Rgb(0x14, 0xB8, 0xA6),
                accent_soft: Color::Rgb(0x99, 0xF6, 0xE4),
                surface: Color::Rgb(0x0F, 0x3D, 0x3E),
                on_surface: Color::White,
            },
        }
    }
}
