use crate::{
    culture::CultureTag,
    error::{PolyglotError, PolyglotResult as Result},
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_QUERY_KEY: &str = "culture";
pub const DEFAULT_UI_QUERY_KEY: &str = "ui-culture";
pub const DEFAULT_COOKIE_NAME: &str = ".Polyglot.Culture";
pub const DEFAULT_MAX_ACCEPT_LANGUAGE_VALUES: usize = 3;

// Query string first, then the preference cookie, then whatever the browser advertises.
pub static DEFAULT_PROVIDERS: Lazy<Vec<CultureProvider>> = Lazy::new(|| {
    vec![
        CultureProvider::QueryString {
            query_key: DEFAULT_QUERY_KEY.to_string(),
            ui_query_key: DEFAULT_UI_QUERY_KEY.to_string(),
        },
        CultureProvider::Cookie {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            max_age_days: None,
        },
        CultureProvider::AcceptLanguage {
            max_values: DEFAULT_MAX_ACCEPT_LANGUAGE_VALUES,
        },
    ]
});

/// A source a request culture may come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CultureProvider {
    QueryString {
        #[serde(default = "default_query_key")]
        query_key: String,
        #[serde(default = "default_ui_query_key")]
        ui_query_key: String,
    },
    Cookie {
        #[serde(default = "default_cookie_name")]
        cookie_name: String,
        /// Lifetime of the preference cookie. Session-scoped when absent.
        #[serde(default)]
        max_age_days: Option<u32>,
    },
    AcceptLanguage {
        #[serde(default = "default_max_values")]
        max_values: usize,
    },
    /// Resolved by a hook registered on the resolver under the same name.
    Custom { name: String },
}

impl CultureProvider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::QueryString { .. } => ProviderKind::QueryString,
            Self::Cookie { .. } => ProviderKind::Cookie,
            Self::AcceptLanguage { .. } => ProviderKind::AcceptLanguage,
            Self::Custom { name } => ProviderKind::Custom(name.clone()),
        }
    }
}

/// Which provider decided the culture of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    QueryString,
    Cookie,
    AcceptLanguage,
    Custom(String),
}

/// The cookie-capable provider, if any is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieProvider<'a> {
    pub cookie_name: &'a str,
    pub max_age_days: Option<u32>,
}

fn default_query_key() -> String {
    DEFAULT_QUERY_KEY.to_string()
}

fn default_ui_query_key() -> String {
    DEFAULT_UI_QUERY_KEY.to_string()
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

fn default_max_values() -> usize {
    DEFAULT_MAX_ACCEPT_LANGUAGE_VALUES
}

fn default_providers() -> Vec<CultureProvider> {
    DEFAULT_PROVIDERS.clone()
}

fn enabled() -> bool {
    true
}

/// Immutable localization configuration, built once at startup and passed to whoever needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizationOptions {
    default_culture: CultureTag,
    #[serde(default)]
    supported_cultures: Vec<CultureTag>,
    #[serde(default)]
    supported_ui_cultures: Option<Vec<CultureTag>>,
    #[serde(default = "enabled")]
    fallback_to_parent_cultures: bool,
    #[serde(default = "enabled")]
    fallback_to_parent_ui_cultures: bool,
    #[serde(default = "default_providers")]
    providers: Vec<CultureProvider>,
}

/// An entry of a language picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CultureOption {
    pub tag: CultureTag,
    pub selected: bool,
}

impl LocalizationOptions {
    /// Options supporting only `default_culture`, with the default provider order.
    pub fn new(default_culture: CultureTag) -> Self {
        Self {
            supported_cultures: vec![default_culture.clone()],
            default_culture,
            supported_ui_cultures: None,
            fallback_to_parent_cultures: true,
            fallback_to_parent_ui_cultures: true,
            providers: default_providers(),
        }
    }

    pub fn set_supported_cultures(mut self, cultures: Vec<CultureTag>) -> Self {
        self.supported_cultures = cultures;
        self
    }

    pub fn set_supported_ui_cultures(mut self, cultures: Vec<CultureTag>) -> Self {
        self.supported_ui_cultures = Some(cultures);
        self
    }

    pub fn set_providers(mut self, providers: Vec<CultureProvider>) -> Self {
        self.providers = providers;
        self
    }

    pub fn set_fallback_to_parent_cultures(mut self, fallback: bool) -> Self {
        self.fallback_to_parent_cultures = fallback;
        self
    }

    pub fn set_fallback_to_parent_ui_cultures(mut self, fallback: bool) -> Self {
        self.fallback_to_parent_ui_cultures = fallback;
        self
    }

    pub fn default_culture(&self) -> &CultureTag {
        &self.default_culture
    }

    pub fn supported_cultures(&self) -> &[CultureTag] {
        &self.supported_cultures
    }

    pub fn supported_ui_cultures(&self) -> &[CultureTag] {
        self.supported_ui_cultures
            .as_deref()
            .unwrap_or(&self.supported_cultures)
    }

    pub fn fallback_to_parent_cultures(&self) -> bool {
        self.fallback_to_parent_cultures
    }

    pub fn fallback_to_parent_ui_cultures(&self) -> bool {
        self.fallback_to_parent_ui_cultures
    }

    pub fn providers(&self) -> &[CultureProvider] {
        &self.providers
    }

    /// The first provider able to persist a preference.
    pub fn cookie_provider(&self) -> Option<CookieProvider<'_>> {
        self.providers.iter().find_map(|p| match p {
            CultureProvider::Cookie {
                cookie_name,
                max_age_days,
            } => Some(CookieProvider {
                cookie_name,
                max_age_days: *max_age_days,
            }),
            _ => None,
        })
    }

    /// The default culture followed by the other supported cultures, without duplicates.
    pub fn selectable_cultures(&self, current: &CultureTag) -> Vec<CultureOption> {
        let mut seen = HashSet::new();
        std::iter::once(&self.default_culture)
            .chain(self.supported_ui_cultures().iter())
            .filter(|tag| seen.insert(*tag))
            .map(|tag| CultureOption {
                tag: tag.clone(),
                selected: tag == current,
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.supported_cultures.is_empty() {
            return Err(PolyglotError::InvalidOptions(
                "at least one supported culture is required".to_string(),
            ));
        }
        if self.supported_ui_cultures().is_empty() {
            return Err(PolyglotError::InvalidOptions(
                "at least one supported UI culture is required".to_string(),
            ));
        }

        let mut cookie_names = HashSet::new();
        for provider in &self.providers {
            match provider {
                CultureProvider::QueryString {
                    query_key,
                    ui_query_key,
                } => {
                    if query_key.is_empty() || ui_query_key.is_empty() {
                        return Err(PolyglotError::InvalidOptions(
                            "query string keys must not be empty".to_string(),
                        ));
                    }
                }
                CultureProvider::Cookie { cookie_name, .. } => {
                    if cookie_name.is_empty() {
                        return Err(PolyglotError::InvalidOptions(
                            "cookie name must not be empty".to_string(),
                        ));
                    }
                    if !cookie_names.insert(cookie_name) {
                        return Err(PolyglotError::InvalidOptions(format!(
                            "cookie `{}` is configured more than once",
                            cookie_name
                        )));
                    }
                }
                CultureProvider::AcceptLanguage { max_values } => {
                    if *max_values == 0 {
                        return Err(PolyglotError::InvalidOptions(
                            "accept_language.max_values must be positive".to_string(),
                        ));
                    }
                }
                CultureProvider::Custom { name } => {
                    if name.trim().is_empty() {
                        return Err(PolyglotError::InvalidOptions(
                            "custom providers need a name".to_string(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
