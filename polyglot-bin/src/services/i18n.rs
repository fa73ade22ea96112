use crate::infras::i18n::Localization;
use polyglot_core::{
    selection::{PreferenceCookie, SelectionRequest, Submission},
    CultureTag,
};
use rocket::{
    form::{self, Contextual, Form},
    http::{uri::Reference, Cookie, CookieJar, SameSite},
    response::Redirect,
    time::Duration,
    State,
};

const MAX_RETURN_URL_LEN: usize = 2048;

#[derive(Debug, FromForm)]
pub struct CultureForm<'r> {
    #[field(validate = well_formed())]
    culture: Option<&'r str>,
    #[field(name = "returnUrl", validate = bounded())]
    return_url: Option<&'r str>,
}

fn well_formed<'v>(culture: &Option<&str>) -> form::Result<'v, ()> {
    if let Some(c) = culture.map(str::trim).filter(|c| !c.is_empty()) {
        if CultureTag::parse(c).is_err() {
            return Err(form::Error::validation("malformed culture tag").into());
        }
    }
    Ok(())
}

fn bounded<'v>(return_url: &Option<&str>) -> form::Result<'v, ()> {
    match return_url {
        Some(url) if url.len() > MAX_RETURN_URL_LEN => {
            Err(form::Error::validation("return URL is too long").into())
        }
        _ => Ok(()),
    }
}

fn describe(error: &form::Error<'_>) -> String {
    match &error.name {
        Some(name) => format!("{}: {}", name, error),
        None => error.to_string(),
    }
}

fn to_cookie(preference: PreferenceCookie) -> Cookie<'static> {
    let mut cookie = Cookie::build((preference.name, preference.value))
        .path("/")
        // Lax so the preference survives arriving from another site through a plain link.
        .same_site(SameSite::Lax)
        .build();
    if let Some(days) = preference.max_age_days {
        cookie.set_max_age(Duration::days(i64::from(days)));
    }
    cookie
}

#[post("/set", data = "<form>")]
pub async fn set_culture<'r>(
    localization: &State<Localization>,
    jar: &CookieJar<'_>,
    form: Form<Contextual<'r, CultureForm<'r>>>,
) -> Redirect {
    let form = form.into_inner();
    let submission = match &form.value {
        Some(f) => Submission::Valid(SelectionRequest {
            culture: f.culture,
            return_target: f.return_url,
        }),
        None => Submission::Invalid(form.context.errors().map(describe).collect()),
    };

    let response = localization.preferences.handle(submission);
    if let Some(preference) = response.cookie {
        jar.add(to_cookie(preference));
    }

    match Reference::parse_owned(response.redirect) {
        Ok(target) => Redirect::to(target),
        Err(e) => {
            log::warn!("Return target is not a valid URI reference: {}", e);
            Redirect::to(uri!("/"))
        }
    }
}
