use serde::{Deserialize, Serialize};

/// Broadcast languages offered to the administrator. English is the base
/// language; the rest are the supported regional languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "ur")]
    Urdu,
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "kn")]
    Kannada,
    #[serde(rename = "or")]
    Odia,
    #[serde(rename = "pa")]
    Punjabi,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "as")]
    Assamese,
}

impl Language {
    pub const ALL: [Language; 13] = [
        Language::English,
        Language::Hindi,
        Language::Bengali,
        Language::Telugu,
        Language::Marathi,
        Language::Tamil,
        Language::Urdu,
        Language::Gujarati,
        Language::Kannada,
        Language::Odia,
        Language::Punjabi,
        Language::Malayalam,
        Language::Assamese,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Bengali => "bn",
            Language::Telugu => "te",
            Language::Marathi => "mr",
            Language::Tamil => "ta",
            Language::Urdu => "ur",
            Language::Gujarati => "gu",
            Language::Kannada => "kn",
            Language::Odia => "or",
            Language::Punjabi => "pa",
            Language::Malayalam => "ml",
            Language::Assamese => "as",
        }
    }

    /// Display name with native script, as shown in the language picker.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi (हिंदी)",
            Language::Bengali => "Bengali (বাংলা)",
            Language::Telugu => "Telugu (తెలుగు)",
            Language::Marathi => "Marathi (मराठी)",
            Language::Tamil => "Tamil (தமிழ்)",
            Language::Urdu => "Urdu (اردو)",
            Language::Gujarati => "Gujarati (ગુજરાતી)",
            Language::Kannada => "Kannada (ಕನ್ನಡ)",
            Language::Odia => "Odia (ଓଡ଼ିଆ)",
            Language::Punjabi => "Punjabi (ਪੰਜਾਬੀ)",
            Language::Malayalam => "Malayalam (മലയാളം)",
            Language::Assamese => "Assamese (অসমীয়া)",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL.iter().copied().find(|l| l.code() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_languages_with_stable_codes() {
        assert_eq!(Language::ALL.len(), 13);
        for language in Language::ALL {
            assert_eq!(Language::from_code(language.code()), Some(language));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::from_code(""), None);
    }

    #[test]
    fn serde_uses_the_iso_code() {
        assert_eq!(serde_json::to_string(&Language::Odia).unwrap(), r#""or""#);
        let parsed: Language = serde_json::from_str(r#""ta""#).unwrap();
        assert_eq!(parsed, Language::Tamil);
        assert!(serde_json::from_str::<Language>(r#""zz""#).is_err());
    }
}
