use crate::infras::i18n::{I18n, Localization};
use polyglot_core::{
    catalog::{FluentArgs, LocalizedString},
    options::{CultureOption, ProviderKind},
    CultureTag,
};
use rocket::{serde::json::Json, State};
use serde::Serialize;

#[derive(Serialize)]
pub struct Page {
    title: String,
    body: String,
    culture: CultureTag,
    ui_culture: CultureTag,
    // Which source decided the culture, absent when the default was used
    provider: Option<ProviderKind>,
    language_label: String,
    current_culture: String,
    cultures: Vec<CultureOption>,
}

impl Page {
    fn new(i18n: I18n, localization: &Localization, title: &str, body: &str) -> Self {
        let mut args = FluentArgs::new();
        args.set("culture", i18n.culture.ui_culture.to_string());
        Self {
            current_culture: i18n.f("current-culture", &args),
            title: i18n.t(title),
            body: i18n.t(body),
            language_label: i18n.t("language"),
            cultures: localization
                .options
                .selectable_cultures(&i18n.culture.ui_culture),
            culture: i18n.culture.culture,
            ui_culture: i18n.culture.ui_culture,
            provider: i18n.culture.provider,
        }
    }
}

#[get("/")]
pub async fn index(i18n: I18n, localization: &State<Localization>) -> Json<Page> {
    Json(Page::new(
        i18n,
        localization,
        "home-title",
        "home-body",
    ))
}

#[get("/privacy")]
pub async fn privacy(i18n: I18n, localization: &State<Localization>) -> Json<Page> {
    Json(Page::new(
        i18n,
        localization,
        "privacy-title",
        "privacy-body",
    ))
}

#[get("/cultures")]
pub async fn cultures(i18n: I18n, localization: &State<Localization>) -> Json<Vec<CultureOption>> {
    Json(
        localization
            .options
            .selectable_cultures(&i18n.culture.ui_culture),
    )
}

/// Every string the current UI culture can see, parents and neutral resources included.
#[get("/strings")]
pub async fn strings(i18n: I18n) -> Json<Vec<LocalizedString>> {
    Json(i18n.localizer.all_strings(true))
}
