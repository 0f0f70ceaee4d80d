use katalyst_views::{NodeTone, Tone};
use ratatui::style::Color;

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Green => Color::Green,
        Tone::Blue => Color::Blue,
        Tone::Yellow => Color::Yellow,
        Tone::Orange => Color::LightRed,
        Tone::Red => Color::Red,
        Tone::Purple => Color::Magenta,
        Tone::Neutral => Color::Gray,
    }
}

pub fn node_color(tone: NodeTone) -> Color {
    match tone {
        NodeTone::Selected => Color::Yellow,
        NodeTone::High => Color::Magenta,
        NodeTone::Medium => Color::Blue,
        NodeTone::Regular => Color::Cyan,
    }
}

/// Terminal cells have no alpha; opacity picks a brightness step.
pub fn edge_color(opacity: f64) -> Color {
    if opacity >= 0.66 {
        Color::White
    } else if opacity >= 0.33 {
        Color::Gray
    } else {
        Color::DarkGray
    }
}
