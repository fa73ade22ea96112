use crate::{cookie::CultureSelection, options::LocalizationOptions};
use std::sync::Arc;

pub const ROOT: &str = "/";

/// The fields of a language form post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRequest<'a> {
    pub culture: Option<&'a str>,
    pub return_target: Option<&'a str>,
}

/// A language form post as seen after form-state validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<'a> {
    Valid(SelectionRequest<'a>),
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The preference cookie was written.
    Persisted,
    /// The form was fine but no cookie provider is configured.
    NoCookieProvider,
    /// Form-state validation failed, nothing was written.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceCookie {
    pub name: String,
    pub value: String,
    /// `None` keeps the cookie for the browser session only.
    pub max_age_days: Option<u32>,
}

/// At most one cookie to set, and exactly one place to redirect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceResponse {
    pub cookie: Option<PreferenceCookie>,
    pub redirect: String,
    pub outcome: SelectionOutcome,
}

/// Records a user's language choice as a preference cookie.
pub struct PreferenceHandler {
    options: Arc<LocalizationOptions>,
}

impl PreferenceHandler {
    pub fn new(options: Arc<LocalizationOptions>) -> Self {
        Self { options }
    }

    pub fn handle(&self, submission: Submission<'_>) -> PreferenceResponse {
        let request = match submission {
            Submission::Valid(request) => request,
            Submission::Invalid(errors) => {
                log::warn!("rejected language selection: {}", errors.join("; "));
                return PreferenceResponse {
                    cookie: None,
                    redirect: ROOT.to_string(),
                    outcome: SelectionOutcome::Rejected,
                };
            }
        };

        let redirect = local_redirect_target(request.return_target)
            .unwrap_or(ROOT)
            .to_string();

        let provider = match self.options.cookie_provider() {
            Some(p) => p,
            None => {
                log::warn!("no cookie culture provider configured, language preference not persisted");
                return PreferenceResponse {
                    cookie: None,
                    redirect,
                    outcome: SelectionOutcome::NoCookieProvider,
                };
            }
        };

        let selection = match request.culture.map(str::trim).filter(|c| !c.is_empty()) {
            Some(culture) => CultureSelection::uniform(culture),
            None => CultureSelection::from_tag(self.options.default_culture()),
        };

        PreferenceResponse {
            cookie: Some(PreferenceCookie {
                name: provider.cookie_name.to_string(),
                value: selection.to_cookie_value(),
                max_age_days: provider.max_age_days,
            }),
            redirect,
            outcome: SelectionOutcome::Persisted,
        }
    }
}

/// Returns the target if it stays on this site, i.e. is an application-relative path.
///
/// `/path` and `~/path` are accepted (the latter is rewritten to `/path`). Absolute URLs,
/// protocol-relative `//host` forms and anything carrying backslashes or control characters
/// are refused.
pub fn local_redirect_target(target: Option<&str>) -> Option<&str> {
    let target = target?;
    if target.chars().any(|c| c.is_control() || c == '\\') {
        return None;
    }

    let path = if let Some(rest) = target.strip_prefix('~') {
        rest
    } else {
        target
    };

    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some('/'), None) => Some(path),
        (Some('/'), Some(second)) if second != '/' => Some(path),
        _ => None,
    }
}
