//! Selector tables for each supported retailer.
//!
//! Update this file when a site changes its markup. Field selectors are
//! tried in order; the first one that yields a non-empty match wins, so new
//! layouts go at the front and old ones stay behind them as fallbacks.

/// Extraction rules for one retailer's listing markup.
#[derive(Debug)]
pub struct SiteRules {
    /// Locates candidate product elements within the page.
    pub container: &'static str,
    pub name: &'static [&'static str],
    pub price: &'static [&'static str],
    pub description: &'static [&'static str],
    /// Matched element's `src` attribute becomes the image URL.
    pub image: &'static [&'static str],
    /// Matched element's `href` attribute becomes the product URL.
    pub link: &'static [&'static str],
}

// Meesho renders through styled-components; the hashed class names below are
// stable per deploy but do churn.
pub static MEESHO: SiteRules = SiteRules {
    container: "div.ProductList__GridCol-sc-8lnc8o-0",
    name: &["p.Text__StyledText-sc-oo0kvp-0"],
    price: &["h5.Text__StyledText-sc-oo0kvp-0"],
    description: &[],
    image: &["img"],
    link: &[],
};

pub static AMAZON: SiteRules = SiteRules {
    container: "div[data-component-type='s-search-result']",
    name: &[
        "h2 span.a-text-normal",
        "h2 a.a-link-normal span",
        "h2 a.a-link-normal",
    ],
    price: &[
        "span.a-price span.a-offscreen",
        "span.a-price:first-of-type span.a-offscreen",
        "span[data-a-color='base'] span.a-offscreen",
        "span.a-price-whole",
    ],
    description: &["div.a-row.a-size-base.a-color-secondary"],
    image: &["img.s-image"],
    link: &["h2 a.a-link-normal"],
};

pub static WALMART: SiteRules = SiteRules {
    container: "div[data-item-id]",
    name: &["span.normal"],
    price: &["div.price-main"],
    description: &[],
    image: &["img.absolute"],
    link: &[],
};

pub static EBAY: SiteRules = SiteRules {
    container: "li.s-item",
    name: &[
        "div.s-item__title",
        "h3.s-item__title",
        "span[role='heading']",
    ],
    price: &[
        "span.s-item__price",
        "div.s-item__detail--primary span.s-item__price",
        "span.s-item__price span",
    ],
    description: &["div.s-item__subtitle"],
    image: &["img.s-item__image-img", "div.s-item__image img"],
    link: &["a.s-item__link"],
};

pub static GENERIC: SiteRules = SiteRules {
    container: "div.product, article.product, .item",
    name: &["h1, h2, .title, .name"],
    price: &[".price, [itemprop='price']"],
    description: &[],
    image: &["img"],
    link: &[],
};

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    fn assert_rules_compile(rules: &SiteRules) {
        assert!(Selector::parse(rules.container).is_ok(), "{}", rules.container);
        for sel in rules
            .name
            .iter()
            .chain(rules.price)
            .chain(rules.description)
            .chain(rules.image)
            .chain(rules.link)
        {
            assert!(Selector::parse(sel).is_ok(), "{sel}");
        }
    }

    #[test]
    fn all_selectors_compile() {
        for rules in [&MEESHO, &AMAZON, &WALMART, &EBAY, &GENERIC] {
            assert_rules_compile(rules);
        }
    }
}
