use crate::culture::CultureTag;
use serde::Serialize;

const CULTURE_PREFIX: &str = "c=";
const UI_CULTURE_PREFIX: &str = "uic=";
const SEPARATOR: char = '|';

/// The pair of cultures a client asked for. The value stored in the preference cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CultureSelection {
    pub culture: String,
    pub ui_culture: String,
}

impl CultureSelection {
    pub fn new(culture: impl Into<String>, ui_culture: impl Into<String>) -> Self {
        Self {
            culture: culture.into(),
            ui_culture: ui_culture.into(),
        }
    }

    /// Use the same tag for formatting and for interface text.
    pub fn uniform(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            culture: tag.clone(),
            ui_culture: tag,
        }
    }

    pub fn from_tag(tag: &CultureTag) -> Self {
        Self::uniform(tag.to_string())
    }

    /// Encode as `c=<culture>|uic=<ui culture>`.
    pub fn to_cookie_value(&self) -> String {
        format!(
            "{}{}{}{}{}",
            CULTURE_PREFIX, self.culture, SEPARATOR, UI_CULTURE_PREFIX, self.ui_culture
        )
    }

    /// Decode a cookie value. A value carrying only one of the two parts uses it for both.
    pub fn from_cookie_value(value: &str) -> Option<Self> {
        let mut culture = None;
        let mut ui_culture = None;

        for part in value.split(SEPARATOR) {
            if let Some(c) = part.strip_prefix(CULTURE_PREFIX) {
                culture = Some(c.trim()).filter(|c| !c.is_empty());
            } else if let Some(uic) = part.strip_prefix(UI_CULTURE_PREFIX) {
                ui_culture = Some(uic.trim()).filter(|c| !c.is_empty());
            }
        }

        match (culture, ui_culture) {
            (Some(c), Some(uic)) => Some(Self::new(c, uic)),
            (Some(only), None) | (None, Some(only)) => Some(Self::uniform(only)),
            (None, None) => None,
        }
    }
}
