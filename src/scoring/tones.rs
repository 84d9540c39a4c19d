use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ToneError;

/// Mandarin tone categories, numbered the way pinyin teaching numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tone {
    /// Tone 1, high and level
    Level,
    /// Tone 2, rising
    Rising,
    /// Tone 3, dipping
    Dip,
    /// Tone 4, falling
    Falling,
    /// Tone 5, neutral or not marked
    Neutral,
}

impl Tone {
    pub fn number(self) -> u8 {
        match self {
            Tone::Level => 1,
            Tone::Rising => 2,
            Tone::Dip => 3,
            Tone::Falling => 4,
            Tone::Neutral => 5,
        }
    }
}

impl From<Tone> for u8 {
    fn from(tone: Tone) -> Self {
        tone.number()
    }
}

impl TryFrom<u8> for Tone {
    type Error = ToneError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tone::Level),
            2 => Ok(Tone::Rising),
            3 => Ok(Tone::Dip),
            4 => Ok(Tone::Falling),
            5 => Ok(Tone::Neutral),
            other => Err(ToneError::invalid_input(format!(
                "tone number must be 1-5, got {other}"
            ))),
        }
    }
}

impl Display for Tone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

const MARKED_VOWELS: [(char, Tone); 24] = [
    ('ā', Tone::Level),
    ('á', Tone::Rising),
    ('ǎ', Tone::Dip),
    ('à', Tone::Falling),
    ('ē', Tone::Level),
    ('é', Tone::Rising),
    ('ě', Tone::Dip),
    ('è', Tone::Falling),
    ('ī', Tone::Level),
    ('í', Tone::Rising),
    ('ǐ', Tone::Dip),
    ('ì', Tone::Falling),
    ('ō', Tone::Level),
    ('ó', Tone::Rising),
    ('ǒ', Tone::Dip),
    ('ò', Tone::Falling),
    ('ū', Tone::Level),
    ('ú', Tone::Rising),
    ('ǔ', Tone::Dip),
    ('ù', Tone::Falling),
    ('ǖ', Tone::Level),
    ('ǘ', Tone::Rising),
    ('ǚ', Tone::Dip),
    ('ǜ', Tone::Falling),
];

/// Expected tone of a pinyin syllable.
///
/// The first character carrying a tone mark decides, so a malformed syllable
/// with several marked vowels takes the tone of the leftmost one. Only
/// precomposed lowercase vowels are recognised; anything else, including a
/// syllable with no mark at all, is [`Tone::Neutral`].
pub fn tone_of(syllable: &str) -> Tone {
    syllable
        .chars()
        .find_map(|ch| {
            MARKED_VOWELS
                .iter()
                .find(|(marked, _)| *marked == ch)
                .map(|(_, tone)| *tone)
        })
        .unwrap_or(Tone::Neutral)
}

#[cfg(test)]
mod tests {
    use super::{tone_of, Tone};

    #[test]
    fn reads_each_tone_mark() {
        assert_eq!(tone_of("mā").number(), 1);
        assert_eq!(tone_of("má").number(), 2);
        assert_eq!(tone_of("mǎ").number(), 3);
        assert_eq!(tone_of("mà").number(), 4);
    }

    #[test]
    fn unmarked_syllable_is_neutral() {
        assert_eq!(tone_of("ma"), Tone::Neutral);
        assert_eq!(tone_of("xie"), Tone::Neutral);
        assert_eq!(tone_of(""), Tone::Neutral);
    }

    #[test]
    fn covers_u_umlaut() {
        assert_eq!(tone_of("lǜ"), Tone::Falling);
        assert_eq!(tone_of("nǚ"), Tone::Dip);
        assert_eq!(tone_of("lü"), Tone::Neutral);
    }

    #[test]
    fn first_marked_vowel_wins() {
        assert_eq!(tone_of("háò"), Tone::Rising);
        assert_eq!(tone_of("hàó"), Tone::Falling);
    }

    #[test]
    fn marks_deep_in_syllable_are_found() {
        assert_eq!(tone_of("zhōng"), Tone::Level);
        assert_eq!(tone_of("wén"), Tone::Rising);
        assert_eq!(tone_of("xiè"), Tone::Falling);
    }

    #[test]
    fn round_trips_tone_numbers() {
        for number in 1..=5u8 {
            let tone = Tone::try_from(number).unwrap();
            assert_eq!(u8::from(tone), number);
        }
        assert!(Tone::try_from(0).is_err());
        assert!(Tone::try_from(6).is_err());
    }
}
