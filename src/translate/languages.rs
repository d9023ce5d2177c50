use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Target languages offered by the front-end selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Hinglish,
    Hindi,
    French,
    Spanish,
    German,
    Italian,
    Chinese,
    Japanese,
    Korean,
}

#[derive(Debug, Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl Language {
    /// Selector order.
    pub const ALL: [Language; 9] = [
        Language::Hinglish,
        Language::Hindi,
        Language::French,
        Language::Spanish,
        Language::German,
        Language::Italian,
        Language::Chinese,
        Language::Japanese,
        Language::Korean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hinglish => "Hinglish",
            Language::Hindi => "Hindi",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Language::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_display_name() {
        for language in Language::ALL {
            assert_eq!(language.to_string().parse::<Language>().unwrap(), language);
        }
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(" french ".parse::<Language>().unwrap(), Language::French);
    }

    #[test]
    fn rejects_unsupported_language() {
        let err = "Klingon".parse::<Language>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported language: Klingon");
    }

    #[test]
    fn selector_defaults_to_first_entry() {
        assert_eq!(Language::default(), Language::ALL[0]);
    }
}
