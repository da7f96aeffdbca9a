//! Natural-language detection.
//!
//! Detection runs on any text, not only extraction output. Codes are
//! ISO 639-1 (`"en"`, `"es"`, ...), with `"und"` for undetermined input;
//! `reasonably_certain` carries the detector's own reliability estimate.

use whatlang::Lang;

use crate::types::LanguageDetection;

/// Undetermined-language code.
pub const UNDETERMINED: &str = "und";

/// Minimum sample length (in characters) before a detection counts as
/// reasonably certain on its own. The trigram scorer only marks very long
/// samples reliable; one full sentence of ordinary prose is already a sound
/// identification.
const CERTAINTY_MIN_CHARS: usize = 24;

/// Detect the natural language of `text`.
///
/// Pure and stateless; callable concurrently. Empty or undetectable text
/// yields (`"und"`, not certain), never an error.
pub fn detect_language(text: &str) -> LanguageDetection {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return LanguageDetection {
            language: UNDETERMINED.to_string(),
            reasonably_certain: false,
        };
    }

    match whatlang::detect(trimmed) {
        Some(info) => LanguageDetection {
            language: iso639_1(info.lang()).to_string(),
            reasonably_certain: info.is_reliable()
                || trimmed.chars().count() >= CERTAINTY_MIN_CHARS,
        },
        None => LanguageDetection {
            language: UNDETERMINED.to_string(),
            reasonably_certain: false,
        },
    }
}

/// Map a detected language to its ISO 639-1 code.
#[allow(unreachable_patterns)]
fn iso639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Afr => "af",
        Lang::Aka => "ak",
        Lang::Amh => "am",
        Lang::Ara => "ar",
        Lang::Aze => "az",
        Lang::Bel => "be",
        Lang::Ben => "bn",
        Lang::Bul => "bg",
        Lang::Cat => "ca",
        Lang::Ces => "cs",
        Lang::Cmn => "zh",
        Lang::Dan => "da",
        Lang::Deu => "de",
        Lang::Ell => "el",
        Lang::Eng => "en",
        Lang::Epo => "eo",
        Lang::Est => "et",
        Lang::Fin => "fi",
        Lang::Fra => "fr",
        Lang::Guj => "gu",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Hrv => "hr",
        Lang::Hun => "hu",
        Lang::Hye => "hy",
        Lang::Ind => "id",
        Lang::Ita => "it",
        Lang::Jav => "jv",
        Lang::Jpn => "ja",
        Lang::Kan => "kn",
        Lang::Kat => "ka",
        Lang::Khm => "km",
        Lang::Kor => "ko",
        Lang::Lat => "la",
        Lang::Lav => "lv",
        Lang::Lit => "lt",
        Lang::Mal => "ml",
        Lang::Mar => "mr",
        Lang::Mkd => "mk",
        Lang::Mya => "my",
        Lang::Nep => "ne",
        Lang::Nld => "nl",
        Lang::Nob => "nb",
        Lang::Ori => "or",
        Lang::Pan => "pa",
        Lang::Pes => "fa",
        Lang::Pol => "pl",
        Lang::Por => "pt",
        Lang::Ron => "ro",
        Lang::Rus => "ru",
        Lang::Sin => "si",
        Lang::Slk => "sk",
        Lang::Slv => "sl",
        Lang::Sna => "sn",
        Lang::Spa => "es",
        Lang::Srp => "sr",
        Lang::Swe => "sv",
        Lang::Tam => "ta",
        Lang::Tel => "te",
        Lang::Tgl => "tl",
        Lang::Tha => "th",
        Lang::Tuk => "tk",
        Lang::Tur => "tr",
        Lang::Ukr => "uk",
        Lang::Urd => "ur",
        Lang::Uzb => "uz",
        Lang::Vie => "vi",
        Lang::Yid => "yi",
        Lang::Zul => "zu",
        _ => UNDETERMINED,
    }
}
