//! Mood styling shared by every rendered screen.

use crate::models::{Mood, MoodStyle, Settings};

/// Glyph and colour for one mood (or for "unset").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodAppearance {
    pub emoji: &'static str,
    /// `#RRGGBB`
    pub color: &'static str,
}

const UNSET_APPEARANCE: MoodAppearance = MoodAppearance {
    emoji: "❓",
    color: "#9CA3AF",
};

#[must_use]
pub const fn mood_appearance(mood: Option<Mood>) -> MoodAppearance {
    match mood {
        Some(Mood::Happy) => MoodAppearance {
            emoji: "😊",
            color: "#4CAF50",
        },
        Some(Mood::Sad) => MoodAppearance {
            emoji: "😔",
            color: "#2196F3",
        },
        Some(Mood::Angry) => MoodAppearance {
            emoji: "😠",
            color: "#FF5722",
        },
        Some(Mood::Excited) => MoodAppearance {
            emoji: "😃",
            color: "#FFC107",
        },
        Some(Mood::Relaxed) => MoodAppearance {
            emoji: "😌",
            color: "#8BC34A",
        },
        None => UNSET_APPEARANCE,
    }
}

/// Resolved rendering preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub mood_style: MoodStyle,
    pub use_color: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Theme {
    #[must_use]
    pub const fn from_settings(settings: &Settings) -> Self {
        Self {
            mood_style: settings.mood_style,
            use_color: settings.use_color,
        }
    }

    /// Theme with colour turned off, for pipes and `NO_COLOR`.
    #[must_use]
    pub const fn without_color(self) -> Self {
        Self {
            use_color: false,
            ..self
        }
    }

    /// `😊 happy`, `happy`, or `no mood`, coloured when enabled.
    #[must_use]
    pub fn mood_label(&self, mood: Option<Mood>) -> String {
        let label = mood.map_or("no mood", Mood::as_str);
        let appearance = mood_appearance(mood);
        let text = match self.mood_style {
            MoodStyle::Emoji => format!("{} {label}", appearance.emoji),
            MoodStyle::Plain => label.to_string(),
        };
        self.paint(&text, appearance.color)
    }

    /// Wrap `text` in a 24-bit ANSI foreground colour.
    #[must_use]
    pub fn paint(&self, text: &str, hex_color: &str) -> String {
        match (self.use_color, parse_hex_color(hex_color)) {
            (true, Some((r, g, b))) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    }

    /// Fixed-width horizontal bar for a percentage in `0..=100`.
    #[must_use]
    pub fn percentage_bar(&self, mood: Mood, percentage: u8, width: usize) -> String {
        let filled = (usize::from(percentage.min(100)) * width + 50) / 100;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(width - filled));
        self.paint(&bar, mood_appearance(Some(mood)).color)
    }
}

fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: Theme = Theme {
        mood_style: MoodStyle::Plain,
        use_color: false,
    };

    #[test]
    fn every_mood_has_a_distinct_appearance() {
        let emojis: std::collections::BTreeSet<_> = Mood::ALL
            .iter()
            .map(|mood| mood_appearance(Some(*mood)).emoji)
            .collect();
        assert_eq!(emojis.len(), Mood::ALL.len());
        assert_eq!(mood_appearance(None), UNSET_APPEARANCE);
    }

    #[test]
    fn labels_follow_style() {
        let emoji = Theme::default().without_color();
        assert_eq!(emoji.mood_label(Some(Mood::Happy)), "😊 happy");
        assert_eq!(PLAIN.mood_label(Some(Mood::Happy)), "happy");
        assert_eq!(PLAIN.mood_label(None), "no mood");
    }

    #[test]
    fn paint_emits_truecolor_escape() {
        let painted = Theme::default().paint("x", "#4CAF50");
        assert_eq!(painted, "\x1b[38;2;76;175;80mx\x1b[0m");
        assert_eq!(Theme::default().paint("x", "green"), "x");
    }

    #[test]
    fn percentage_bar_has_fixed_width() {
        assert_eq!(PLAIN.percentage_bar(Mood::Sad, 67, 10), "███████░░░");
        assert_eq!(PLAIN.percentage_bar(Mood::Sad, 0, 4), "░░░░");
        assert_eq!(PLAIN.percentage_bar(Mood::Sad, 100, 4), "████");
    }
}
