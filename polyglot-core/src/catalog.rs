use crate::{
    culture::CultureTag,
    error::{PolyglotError, PolyglotResult as Result},
};
use fluent_bundle::{concurrent::FluentBundle, FluentResource};
use fluent_syntax::ast;
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use unic_langid::LanguageIdentifier;

pub use fluent_bundle::FluentArgs;

// One bundle per culture, plus the message ids it holds so the table can be listed.
struct Table {
    bundle: FluentBundle<FluentResource>,
    keys: Vec<String>,
}

impl Table {
    fn new(culture: Option<&CultureTag>) -> Self {
        let locale = culture
            .map(|c| c.langid().clone())
            .unwrap_or_else(LanguageIdentifier::default);
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // No bidi isolation marks around placeables
        bundle.set_use_isolating(false);
        Self {
            bundle,
            keys: Vec::new(),
        }
    }

    fn message(&self, key: &str, args: Option<&FluentArgs>) -> Option<String> {
        let pattern = self.bundle.get_message(key)?.value()?;
        let mut errors = vec![];
        let value = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            log::warn!("Formatting message `{}` failed: {:?}", key, errors);
        }
        Some(value.into_owned())
    }
}

/// Translated interface strings: one Fluent bundle per culture plus a neutral bundle.
pub struct ResourceCatalog {
    neutral: Table,
    cultures: HashMap<CultureTag, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedString {
    pub name: String,
    pub value: String,
    /// The key itself was returned because no table had it.
    pub resource_not_found: bool,
    /// The table the value came from, `None` for the neutral table or a miss.
    pub searched_culture: Option<CultureTag>,
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self {
            neutral: Table::new(None),
            cultures: HashMap::new(),
        }
    }
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add Fluent (`.ftl`) messages to the table of `culture` (`None` for neutral).
    /// A message already present is replaced.
    pub fn insert_ftl(&mut self, culture: Option<CultureTag>, source: &str) -> Result<()> {
        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            PolyglotError::ResourceParse {
                culture: culture
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "neutral".to_string()),
                reason: format!("{:?}", errors),
            }
        })?;

        let table = self.table_mut(culture);
        for entry in resource.entries() {
            if let ast::Entry::Message(ast::Message {
                id, value: Some(_), ..
            }) = entry
            {
                if !table.keys.iter().any(|k| k == id.name) {
                    table.keys.push(id.name.to_string());
                }
            }
        }
        table.bundle.add_resource_overriding(resource);
        Ok(())
    }

    pub fn cultures(&self) -> impl Iterator<Item = &CultureTag> {
        self.cultures.keys()
    }

    fn table_mut(&mut self, culture: Option<CultureTag>) -> &mut Table {
        match culture {
            Some(c) => {
                let key = c.clone();
                self.cultures
                    .entry(key)
                    .or_insert_with(|| Table::new(Some(&c)))
            }
            None => &mut self.neutral,
        }
    }
}

/// Looks strings up for one UI culture, walking its fallback chain down to the neutral table.
#[derive(Clone)]
pub struct Localizer {
    catalog: Arc<ResourceCatalog>,
    chain: Vec<CultureTag>,
}

impl Localizer {
    pub fn new(catalog: Arc<ResourceCatalog>, ui_culture: &CultureTag) -> Self {
        Self {
            catalog,
            chain: ui_culture.fallback_chain(),
        }
    }

    pub fn get(&self, key: &str) -> LocalizedString {
        self.lookup(key, None)
    }

    /// Shorthand for the translated text.
    pub fn text(&self, key: &str) -> String {
        self.get(key).value
    }

    /// Translate `key`, filling its `{ $name }` placeables from `args`.
    pub fn format(&self, key: &str, args: &FluentArgs) -> String {
        self.lookup(key, Some(args)).value
    }

    fn lookup(&self, key: &str, args: Option<&FluentArgs>) -> LocalizedString {
        let found = self
            .chain
            .iter()
            .filter_map(|c| self.catalog.cultures.get(c).map(|t| (Some(c), t)))
            .chain(std::iter::once((None, &self.catalog.neutral)))
            .find_map(|(culture, table)| {
                table
                    .message(key, args)
                    .map(|value| (culture.cloned(), value))
            });

        match found {
            Some((searched_culture, value)) => LocalizedString {
                name: key.to_string(),
                value,
                resource_not_found: false,
                searched_culture,
            },
            None => LocalizedString {
                name: key.to_string(),
                value: key.to_string(),
                resource_not_found: true,
                searched_culture: None,
            },
        }
    }

    /// Every string visible to this culture. Without parents only the culture's own table counts.
    pub fn all_strings(&self, include_parents: bool) -> Vec<LocalizedString> {
        let tables: Vec<(Option<&CultureTag>, &Table)> = if include_parents {
            self.chain
                .iter()
                .filter_map(|c| self.catalog.cultures.get(c).map(|t| (Some(c), t)))
                .chain(std::iter::once((None, &self.catalog.neutral)))
                .collect()
        } else {
            self.chain
                .first()
                .and_then(|c| self.catalog.cultures.get(c).map(|t| (Some(c), t)))
                .into_iter()
                .collect()
        };

        let mut seen = std::collections::HashSet::new();
        let mut strings = Vec::new();
        for (culture, table) in tables {
            let mut keys: Vec<&String> = table.keys.iter().collect();
            keys.sort();
            for key in keys {
                if !seen.insert(key.as_str()) {
                    continue;
                }
                if let Some(value) = table.message(key, None) {
                    strings.push(LocalizedString {
                        name: key.clone(),
                        value,
                        resource_not_found: false,
                        searched_culture: culture.cloned(),
                    });
                }
            }
        }
        strings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> CultureTag {
        CultureTag::parse(s).unwrap()
    }

    fn catalog() -> Arc<ResourceCatalog> {
        let mut catalog = ResourceCatalog::new();
        catalog
            .insert_ftl(None, "hello = Hello\nwelcome = Welcome, { $name }\n")
            .unwrap();
        catalog
            .insert_ftl(Some(tag("fr")), "hello = Bonjour\nprivacy = Confidentialité\n")
            .unwrap();
        catalog
            .insert_ftl(Some(tag("fr-FR")), "hello = Bonjour de France\n")
            .unwrap();
        catalog
            .insert_ftl(
                Some(tag("de")),
                "welcome = Willkommen, { $name }\ngreeting = Hallo { $name }, du bist { $role }\n",
            )
            .unwrap();
        Arc::new(catalog)
    }

    #[test]
    fn walks_the_fallback_chain() {
        let fr_fr = Localizer::new(catalog(), &tag("fr-FR"));
        assert_eq!(fr_fr.text("hello"), "Bonjour de France");
        let privacy = fr_fr.get("privacy");
        assert_eq!(privacy.value, "Confidentialité");
        assert_eq!(privacy.searched_culture, Some(tag("fr")));

        let fr_ca = Localizer::new(catalog(), &tag("fr-CA"));
        assert_eq!(fr_ca.text("hello"), "Bonjour");

        let ja = Localizer::new(catalog(), &tag("ja"));
        let hello = ja.get("hello");
        assert_eq!(hello.value, "Hello");
        assert!(!hello.resource_not_found);
        assert_eq!(hello.searched_culture, None);
    }

    #[test]
    fn missing_key_returns_key() {
        let missing = Localizer::new(catalog(), &tag("fr")).get("about-us");
        assert_eq!(missing.value, "about-us");
        assert!(missing.resource_not_found);
    }

    #[test]
    fn formats_arguments() {
        let de = Localizer::new(catalog(), &tag("de-DE"));
        let mut args = FluentArgs::new();
        args.set("name", "Ada");
        assert_eq!(de.format("welcome", &args), "Willkommen, Ada");
    }

    #[test]
    fn arguments_are_not_substituted_twice() {
        let de = Localizer::new(catalog(), &tag("de"));
        let mut args = FluentArgs::new();
        args.set("name", "{ $role }");
        args.set("role", "admin");
        assert_eq!(
            de.format("greeting", &args),
            "Hallo { $role }, du bist admin"
        );
    }

    #[test]
    fn later_resources_replace_messages() {
        let mut catalog = ResourceCatalog::new();
        catalog.insert_ftl(Some(tag("es")), "hello = Hola\n").unwrap();
        catalog
            .insert_ftl(Some(tag("es")), "hello = Buenas\n")
            .unwrap();
        let es = Localizer::new(Arc::new(catalog), &tag("es"));
        assert_eq!(es.text("hello"), "Buenas");
        assert_eq!(es.all_strings(false).len(), 1);
    }

    #[test]
    fn lists_strings() {
        let fr_fr = Localizer::new(catalog(), &tag("fr-FR"));

        let own: Vec<_> = fr_fr.all_strings(false).into_iter().map(|s| s.value).collect();
        assert_eq!(own, vec!["Bonjour de France"]);

        let all = fr_fr.all_strings(true);
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["hello", "privacy", "welcome"]);
        assert_eq!(all[0].value, "Bonjour de France");
        assert_eq!(all[2].searched_culture, None);
    }

    #[test]
    fn malformed_resources_are_reported() {
        let mut catalog = ResourceCatalog::new();
        let err = catalog
            .insert_ftl(Some(tag("es")), "hello = Hola\nthis is not fluent\n")
            .unwrap_err();
        assert!(matches!(err, PolyglotError::ResourceParse { ref culture, .. } if culture == "es"));
    }
}
