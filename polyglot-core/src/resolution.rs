use crate::{
    accept_language,
    cookie::CultureSelection,
    culture::CultureTag,
    options::{CultureProvider, LocalizationOptions, ProviderKind},
};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};

pub const ACCEPT_LANGUAGE: &str = "Accept-Language";

/// What a culture provider needs to see of an incoming request.
pub trait RequestView {
    fn query_value(&self, key: &str) -> Option<String>;
    fn cookie_value(&self, name: &str) -> Option<String>;
    fn header_value(&self, name: &str) -> Option<String>;
}

/// A hook answering for a `custom` provider entry.
pub trait CustomCultureProvider: Send + Sync {
    fn determine(&self, request: &dyn RequestView) -> Option<CultureSelection>;
}

impl<F> CustomCultureProvider for F
where
    F: Fn(&dyn RequestView) -> Option<CultureSelection> + Send + Sync,
{
    fn determine(&self, request: &dyn RequestView) -> Option<CultureSelection> {
        self(request)
    }
}

/// The culture a request is served in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestCulture {
    pub culture: CultureTag,
    pub ui_culture: CultureTag,
    /// `None` when no provider matched and the default culture was used.
    pub provider: Option<ProviderKind>,
}

// Candidate tags offered by one provider, in preference order.
#[derive(Debug, Default)]
struct Candidates {
    cultures: Vec<String>,
    ui_cultures: Vec<String>,
}

impl Candidates {
    fn uniform(tags: Vec<String>) -> Self {
        Self {
            ui_cultures: tags.clone(),
            cultures: tags,
        }
    }

    fn from_selection(selection: CultureSelection) -> Self {
        Self {
            cultures: vec![selection.culture],
            ui_cultures: vec![selection.ui_culture],
        }
    }
}

pub struct CultureResolver {
    options: Arc<LocalizationOptions>,
    custom: HashMap<String, Arc<dyn CustomCultureProvider>>,
}

impl CultureResolver {
    pub fn new(options: Arc<LocalizationOptions>) -> Self {
        Self {
            options,
            custom: HashMap::new(),
        }
    }

    /// Register the hook backing the `custom` provider entry called `name`.
    pub fn register_custom(
        mut self,
        name: impl Into<String>,
        provider: impl CustomCultureProvider + 'static,
    ) -> Self {
        self.custom.insert(name.into(), Arc::new(provider));
        self
    }

    /// Names of configured `custom` providers that no hook answers for.
    pub fn unregistered_custom(&self) -> Vec<&str> {
        self.options
            .providers()
            .iter()
            .filter_map(|p| match p {
                CultureProvider::Custom { name } if !self.custom.contains_key(name) => {
                    Some(name.as_str())
                }
                _ => None,
            })
            .collect()
    }

    pub fn default_culture(&self) -> RequestCulture {
        RequestCulture {
            culture: self.options.default_culture().clone(),
            ui_culture: self.options.default_culture().clone(),
            provider: None,
        }
    }

    pub fn resolve(&self, request: &dyn RequestView) -> RequestCulture {
        for provider in self.options.providers() {
            let candidates = match self.candidates(provider, request) {
                Some(c) => c,
                None => continue,
            };

            let culture = first_supported(
                &candidates.cultures,
                self.options.supported_cultures(),
                self.options.fallback_to_parent_cultures(),
            );
            let ui_culture = first_supported(
                &candidates.ui_cultures,
                self.options.supported_ui_cultures(),
                self.options.fallback_to_parent_ui_cultures(),
            );

            let (culture, ui_culture) = match (culture, ui_culture) {
                (None, None) => {
                    log::debug!(
                        "{:?} offered {:?}/{:?}, none of which is supported",
                        provider.kind(),
                        candidates.cultures,
                        candidates.ui_cultures
                    );
                    continue;
                }
                (c, uic) => (
                    c.unwrap_or_else(|| self.options.default_culture().clone()),
                    uic.unwrap_or_else(|| self.options.default_culture().clone()),
                ),
            };

            return RequestCulture {
                culture,
                ui_culture,
                provider: Some(provider.kind()),
            };
        }

        self.default_culture()
    }

    fn candidates(
        &self,
        provider: &CultureProvider,
        request: &dyn RequestView,
    ) -> Option<Candidates> {
        match provider {
            CultureProvider::QueryString {
                query_key,
                ui_query_key,
            } => {
                let culture = non_empty(request.query_value(query_key));
                let ui_culture = non_empty(request.query_value(ui_query_key));
                match (culture, ui_culture) {
                    (None, None) => None,
                    (Some(c), Some(uic)) => Some(Candidates::from_selection(
                        CultureSelection::new(c, uic),
                    )),
                    (Some(only), None) | (None, Some(only)) => {
                        Some(Candidates::uniform(vec![only]))
                    }
                }
            }
            CultureProvider::Cookie { cookie_name, .. } => request
                .cookie_value(cookie_name)
                .and_then(|v| CultureSelection::from_cookie_value(&v))
                .map(Candidates::from_selection),
            CultureProvider::AcceptLanguage { max_values } => {
                let header = request.header_value(ACCEPT_LANGUAGE)?;
                let tags: Vec<String> = accept_language::preferred_tags(&header, *max_values)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                if tags.is_empty() {
                    None
                } else {
                    Some(Candidates::uniform(tags))
                }
            }
            CultureProvider::Custom { name } => match self.custom.get(name) {
                Some(hook) => hook.determine(request).map(Candidates::from_selection),
                None => {
                    log::warn!("no hook registered for custom culture provider `{}`", name);
                    None
                }
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// For each candidate in order: the candidate itself, then (if allowed) its parent.
fn first_supported(
    candidates: &[String],
    supported: &[CultureTag],
    fallback_to_parent: bool,
) -> Option<CultureTag> {
    candidates
        .iter()
        .filter_map(|c| CultureTag::parse(c).ok())
        .find_map(|tag| {
            let chain = if fallback_to_parent {
                tag.fallback_chain()
            } else {
                vec![tag]
            };
            chain
                .into_iter()
                .find_map(|t| supported.iter().find(|s| **s == t).cloned())
        })
}

#[cfg(test)]
mod tests;
