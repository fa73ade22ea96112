//! Parsing of the `Accept-Language` request header.

/// A single weighted entry of an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedLanguage<'a> {
    pub tag: &'a str,
    pub quality: f32,
}

/// Parses an `Accept-Language` header into entries ordered by descending quality.
///
/// Entries with equal quality keep the order in which the client sent them. Wildcards and
/// entries with a zero (or unparsable) weight are dropped.
pub fn parse(header: &str) -> Vec<WeightedLanguage<'_>> {
    let mut langs: Vec<WeightedLanguage<'_>> = header
        .split(',')
        .filter_map(|entry| {
            let mut params = entry.split(';');
            let tag = params.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let mut quality = 1.0;
            for param in params {
                if let Some((key, value)) = param.split_once('=') {
                    if key.trim().eq_ignore_ascii_case("q") {
                        quality = value
                            .trim()
                            .parse::<f32>()
                            .map(|q| q.clamp(0.0, 1.0))
                            .unwrap_or(0.0);
                    }
                }
            }

            if quality > 0.0 {
                Some(WeightedLanguage { tag, quality })
            } else {
                None
            }
        })
        .collect();

    // sort_by is stable
    langs.sort_by(|a, b| {
        b.quality
            .partial_cmp(&a.quality)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    langs
}

/// The tags worth trying: the `max_values` highest weighted ones, not the first ones sent.
pub fn preferred_tags(header: &str, max_values: usize) -> Vec<&str> {
    parse(header)
        .into_iter()
        .take(max_values)
        .map(|l| l.tag)
        .collect()
}
