use anyhow::anyhow;
use polyglot_core::{
    catalog::{FluentArgs, Localizer, ResourceCatalog},
    cookie::CultureSelection,
    options::LocalizationOptions,
    resolution::{CultureResolver, RequestCulture, RequestView},
    selection::PreferenceHandler,
    CultureTag,
};
use rocket::{
    fairing::{AdHoc, Fairing},
    figment::Figment,
    http::Status,
    request::{FromRequest, Outcome, Request},
};
use rust_embed::RustEmbed;
use std::{path::Path, sync::Arc};

// Resource file holding the strings shared by every culture.
const NEUTRAL_RESOURCES: &str = "neutral";

/// Header read by the `culture_header` custom provider, for proxies that already know the culture.
pub const CULTURE_HEADER: &str = "X-Culture";

#[derive(RustEmbed)]
#[folder = "resources/"]
struct Resources;

/// Everything localization needs at request time, built once at ignition.
pub struct Localization {
    pub options: Arc<LocalizationOptions>,
    pub resolver: CultureResolver,
    pub preferences: PreferenceHandler,
    pub catalog: Arc<ResourceCatalog>,
}

impl Localization {
    fn from_figment(figment: &Figment) -> Result<Self, anyhow::Error> {
        let options: LocalizationOptions = figment.extract_inner("localization")?;
        options.validate()?;
        let options = Arc::new(options);

        let resolver = register_custom_providers(CultureResolver::new(options.clone()));
        let unregistered = resolver.unregistered_custom();
        if !unregistered.is_empty() {
            return Err(anyhow!(
                "no hook for custom culture providers: {}",
                unregistered.join(", ")
            ));
        }

        let catalog = Arc::new(load_resources()?);

        log::info!(
            "Localization ready: default culture {}, {} supported, resources for {} cultures",
            options.default_culture(),
            options.supported_cultures().len(),
            catalog.cultures().count()
        );
        if options.cookie_provider().is_none() {
            log::warn!("No cookie culture provider configured, language choices will not be remembered");
        }

        Ok(Self {
            resolver,
            preferences: PreferenceHandler::new(options.clone()),
            options,
            catalog,
        })
    }

    pub fn fairing() -> impl Fairing {
        AdHoc::try_on_ignite("localization", move |rocket| async move {
            let localization = match Self::from_figment(rocket.figment()) {
                Ok(l) => l,
                Err(e) => {
                    log::error!("Invalid localization configuration: {:?}", e);
                    return Err(rocket);
                }
            };
            Ok(rocket.manage(localization))
        })
    }
}

// Every `custom` provider entry a configuration may name.
fn register_custom_providers(resolver: CultureResolver) -> CultureResolver {
    resolver.register_custom("culture_header", |request: &dyn RequestView| {
        request
            .header_value(CULTURE_HEADER)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(CultureSelection::uniform)
    })
}

// Files are named after the culture they translate to, e.g. `fr-FR.ftl`.
fn load_resources() -> Result<ResourceCatalog, anyhow::Error> {
    let mut catalog = ResourceCatalog::new();
    for name in Resources::iter() {
        let path = Path::new(&*name);
        if path.extension().and_then(|e| e.to_str()) != Some("ftl") {
            continue;
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("resource file name `{}` is not valid UTF-8", name))?;
        let culture = if stem == NEUTRAL_RESOURCES {
            None
        } else {
            Some(CultureTag::parse(stem)?)
        };

        let file = Resources::get(&name)
            .ok_or_else(|| anyhow!("resource file `{}` vanished", name))?;
        catalog.insert_ftl(culture, std::str::from_utf8(&file.data)?)?;
    }
    Ok(catalog)
}

// Lets the resolver peek at a Rocket request.
struct RocketRequest<'a, 'r>(&'a Request<'r>);

impl RequestView for RocketRequest<'_, '_> {
    fn query_value(&self, key: &str) -> Option<String> {
        self.0.query_value::<String>(key).and_then(|v| v.ok())
    }

    fn cookie_value(&self, name: &str) -> Option<String> {
        self.0.cookies().get(name).map(|c| c.value().to_string())
    }

    fn header_value(&self, name: &str) -> Option<String> {
        self.0.headers().get_one(name).map(str::to_string)
    }
}

/// A request guard to get the culture of the current request and the matching translations.
pub struct I18n {
    pub culture: RequestCulture,
    pub localizer: Localizer,
}

impl I18n {
    pub fn t(&self, key: &str) -> String {
        self.localizer.text(key)
    }

    pub fn f(&self, key: &str, args: &FluentArgs) -> String {
        self.localizer.format(key, args)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for I18n {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let localization = match req.rocket().state::<Localization>() {
            Some(l) => l,
            None => {
                log::error!("Localization is not managed by Rocket, is the fairing attached?");
                return Outcome::Error((Status::InternalServerError, ()));
            }
        };

        let culture = localization.resolver.resolve(&RocketRequest(req));
        Outcome::Success(I18n {
            localizer: Localizer::new(localization.catalog.clone(), &culture.ui_culture),
            culture,
        })
    }
}
