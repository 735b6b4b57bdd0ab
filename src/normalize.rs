//! Shared field cleanup applied uniformly by every site ruleset.

/// Reduce a raw price string to digits and decimal points, then parse.
///
/// Currency symbols, thousands separators and surrounding text are dropped;
/// whatever remains must parse as a single non-negative number. A string
/// with two price points in it ("$20.99 to $38.11") reduces to something
/// unparseable and is rejected rather than guessed at.
///
/// Idempotent: an already-clean numeric string parses to itself.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned = strip_price(text);
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// The cleaning half of [`parse_price`]: digits and decimal points only.
/// Extractors use this to tell "no price at all" apart from "a price we
/// cannot make sense of" — the two skip differently.
pub fn strip_price(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prefix a relative href with the site's canonical origin. Hrefs that are
/// already absolute pass through, as do hrefs for sites with no known
/// origin.
pub fn absolutize(href: &str, origin: Option<&str>) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    match origin {
        Some(origin) => format!("{origin}{href}"),
        None => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_currency_prefixed_prices() {
        assert_eq!(parse_price("$1,299.00"), Some(1299.0));
        assert_eq!(parse_price("₹449"), Some(449.0));
        assert_eq!(parse_price("USD 12.34"), Some(12.34));
    }

    #[test]
    fn cleaning_is_idempotent() {
        let clean = "1299.00";
        let once = parse_price(clean).unwrap();
        let twice = parse_price(&once.to_string()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_price_ranges() {
        // two decimal points survive the strip and fail the parse
        assert_eq!(parse_price("$20.99 to $38.11"), None);
    }

    #[test]
    fn rejects_empty_and_non_numeric() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("Free shipping"), None);
        assert_eq!(parse_price("."), None);
    }

    #[test]
    fn squashes_whitespace() {
        assert_eq!(squash_whitespace("  Gaming\n  Laptop  "), "Gaming Laptop");
    }

    #[test]
    fn absolutizes_relative_hrefs_only() {
        assert_eq!(
            absolutize("/dp/B0TEST", Some("https://www.amazon.com")),
            "https://www.amazon.com/dp/B0TEST"
        );
        assert_eq!(
            absolutize("https://www.amazon.com/dp/B0TEST", Some("https://www.amazon.com")),
            "https://www.amazon.com/dp/B0TEST"
        );
        assert_eq!(absolutize("/item/1", None), "/item/1");
    }
}
