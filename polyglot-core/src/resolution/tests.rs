use super::*;
use crate::options::DEFAULT_COOKIE_NAME;
use maplit::hashmap;

#[derive(Default)]
struct FakeRequest {
    query: HashMap<&'static str, &'static str>,
    cookies: HashMap<&'static str, &'static str>,
    headers: HashMap<&'static str, &'static str>,
}

impl RequestView for FakeRequest {
    fn query_value(&self, key: &str) -> Option<String> {
        self.query.get(key).map(|v| v.to_string())
    }

    fn cookie_value(&self, name: &str) -> Option<String> {
        self.cookies.get(name).map(|v| v.to_string())
    }

    fn header_value(&self, name: &str) -> Option<String> {
        self.headers.get(name).map(|v| v.to_string())
    }
}

fn tag(s: &str) -> CultureTag {
    CultureTag::parse(s).unwrap()
}

fn options() -> LocalizationOptions {
    LocalizationOptions::new(tag("en-US")).set_supported_cultures(vec![
        tag("en-US"),
        tag("fr-FR"),
        tag("fr"),
        tag("de-DE"),
        tag("es"),
        tag("ar-LB"),
    ])
}

fn resolver() -> CultureResolver {
    CultureResolver::new(Arc::new(options()))
}

#[test]
fn default_when_nothing_is_offered() {
    let resolved = resolver().resolve(&FakeRequest::default());
    assert_eq!(resolved.culture, tag("en-US"));
    assert_eq!(resolved.ui_culture, tag("en-US"));
    assert_eq!(resolved.provider, None);
}

#[test]
fn query_string_beats_cookie_and_header() {
    let request = FakeRequest {
        query: hashmap! { "culture" => "es" },
        cookies: hashmap! { DEFAULT_COOKIE_NAME => "c=fr-FR|uic=fr-FR" },
        headers: hashmap! { ACCEPT_LANGUAGE => "de-DE" },
    };
    let resolved = resolver().resolve(&request);
    assert_eq!(resolved.culture, tag("es"));
    assert_eq!(resolved.ui_culture, tag("es"));
    assert_eq!(resolved.provider, Some(ProviderKind::QueryString));
}

#[test]
fn separate_ui_culture_in_query() {
    let request = FakeRequest {
        query: hashmap! { "culture" => "de-DE", "ui-culture" => "fr-FR" },
        ..Default::default()
    };
    let resolved = resolver().resolve(&request);
    assert_eq!(resolved.culture, tag("de-DE"));
    assert_eq!(resolved.ui_culture, tag("fr-FR"));
}

#[test]
fn cookie_beats_header() {
    let request = FakeRequest {
        cookies: hashmap! { DEFAULT_COOKIE_NAME => "c=ar-LB|uic=ar-LB" },
        headers: hashmap! { ACCEPT_LANGUAGE => "de-DE" },
        ..Default::default()
    };
    let resolved = resolver().resolve(&request);
    assert_eq!(resolved.culture, tag("ar-LB"));
    assert_eq!(resolved.provider, Some(ProviderKind::Cookie));
}

#[test]
fn unsupported_cookie_falls_through() {
    let request = FakeRequest {
        cookies: hashmap! { DEFAULT_COOKIE_NAME => "c=ja-JP|uic=ja-JP" },
        headers: hashmap! { ACCEPT_LANGUAGE => "ja, de-DE;q=0.8" },
        ..Default::default()
    };
    let resolved = resolver().resolve(&request);
    assert_eq!(resolved.culture, tag("de-DE"));
    assert_eq!(resolved.provider, Some(ProviderKind::AcceptLanguage));
}

#[test]
fn parent_fallback() {
    // fr-CA is not supported but fr is
    let request = FakeRequest {
        headers: hashmap! { ACCEPT_LANGUAGE => "fr-CA" },
        ..Default::default()
    };
    assert_eq!(resolver().resolve(&request).culture, tag("fr"));

    let strict = CultureResolver::new(Arc::new(
        options()
            .set_fallback_to_parent_cultures(false)
            .set_fallback_to_parent_ui_cultures(false),
    ));
    assert_eq!(strict.resolve(&request).provider, None);
}

#[test]
fn candidate_order_precedes_parent_of_later_candidates() {
    // es-MX falls back to es before de-DE is looked at
    let request = FakeRequest {
        headers: hashmap! { ACCEPT_LANGUAGE => "es-MX, de-DE" },
        ..Default::default()
    };
    assert_eq!(resolver().resolve(&request).culture, tag("es"));
}

#[test]
fn only_first_header_values_are_tried() {
    let request = FakeRequest {
        headers: hashmap! { ACCEPT_LANGUAGE => "ja, ko, zh, es" },
        ..Default::default()
    };
    assert_eq!(resolver().resolve(&request).provider, None);
}

#[test]
fn missing_ui_side_takes_default() {
    let resolver = CultureResolver::new(Arc::new(
        options().set_supported_ui_cultures(vec![tag("en-US"), tag("de-DE")]),
    ));
    let request = FakeRequest {
        cookies: hashmap! { DEFAULT_COOKIE_NAME => "c=fr-FR|uic=fr-FR" },
        ..Default::default()
    };
    let resolved = resolver.resolve(&request);
    assert_eq!(resolved.culture, tag("fr-FR"));
    assert_eq!(resolved.ui_culture, tag("en-US"));
}

#[test]
fn malformed_candidates_are_skipped() {
    let request = FakeRequest {
        query: hashmap! { "culture" => "<script>" },
        cookies: hashmap! { DEFAULT_COOKIE_NAME => "garbage" },
        ..Default::default()
    };
    assert_eq!(resolver().resolve(&request), resolver().default_culture());
}

#[test]
fn custom_provider() {
    let opts = options().set_providers(vec![
        CultureProvider::Custom {
            name: "tenant".to_string(),
        },
        CultureProvider::Custom {
            name: "unregistered".to_string(),
        },
    ]);
    let resolver = CultureResolver::new(Arc::new(opts)).register_custom(
        "tenant",
        |request: &dyn RequestView| {
            request
                .header_value("X-Tenant-Locale")
                .map(CultureSelection::uniform)
        },
    );

    let request = FakeRequest {
        headers: hashmap! { "X-Tenant-Locale" => "ar-LB" },
        ..Default::default()
    };
    let resolved = resolver.resolve(&request);
    assert_eq!(resolved.culture, tag("ar-LB"));
    assert_eq!(
        resolved.provider,
        Some(ProviderKind::Custom("tenant".to_string()))
    );

    assert_eq!(resolver.resolve(&FakeRequest::default()).provider, None);
    assert_eq!(resolver.unregistered_custom(), vec!["unregistered"]);
}
