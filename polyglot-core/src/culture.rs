use crate::error::{PolyglotError, PolyglotResult as Result};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};
use unic_langid::{subtags::Language, LanguageIdentifier};

/// A `<language>[-<region>]` culture identifier, e.g. `fr-FR`, `de` or `ar-LB`.
///
/// Tags are kept in canonical casing, so two tags naming the same culture compare equal
/// regardless of how they were spelled on the wire. A script may stand in for the region
/// (`zh-Hans`), but never both, and variants are refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CultureTag(LanguageIdentifier);

impl CultureTag {
    pub fn parse(tag: &str) -> Result<Self> {
        let invalid = |reason| PolyglotError::InvalidCultureTag {
            tag: tag.to_string(),
            reason,
        };

        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty tag"));
        }

        let langid: LanguageIdentifier = trimmed
            .parse()
            .map_err(|_| invalid("not a well-formed language identifier"))?;
        if langid.language == Language::default() {
            return Err(invalid("language subtag is missing"));
        }
        if langid.variants().next().is_some() || (langid.script.is_some() && langid.region.is_some())
        {
            return Err(invalid("more than two subtags"));
        }

        Ok(Self(langid))
    }

    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }

    pub fn region(&self) -> Option<&str> {
        self.0.region.as_ref().map(|r| r.as_str())
    }

    pub fn script(&self) -> Option<&str> {
        self.0.script.as_ref().map(|s| s.as_str())
    }

    pub fn langid(&self) -> &LanguageIdentifier {
        &self.0
    }

    /// The neutral culture of a specific one (`fr-FR` -> `fr`). Neutral cultures have no parent.
    pub fn parent(&self) -> Option<CultureTag> {
        if self.is_neutral() {
            return None;
        }
        Some(Self(LanguageIdentifier::from_parts(
            self.0.language,
            None,
            None,
            &[],
        )))
    }

    pub fn is_neutral(&self) -> bool {
        self.0.script.is_none() && self.0.region.is_none()
    }

    /// The tag itself followed by its parents, most specific first.
    pub fn fallback_chain(&self) -> Vec<CultureTag> {
        let mut chain = vec![self.clone()];
        if let Some(parent) = self.parent() {
            chain.push(parent);
        }
        chain
    }
}

impl fmt::Display for CultureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for CultureTag {
    type Err = PolyglotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CultureTag {
    type Error = PolyglotError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CultureTag> for String {
    fn from(tag: CultureTag) -> Self {
        tag.to_string()
    }
}
