//! Applies a site's selector rules to one parsed listing page.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{Site, SiteRules};
use crate::normalize::{absolutize, parse_price, squash_whitespace, strip_price};
use crate::types::{DraftOutcome, Product, ProductDraft, RejectReason};

/// What one page yielded. `candidates` counts container elements before any
/// acceptance rule ran; the pagination controller stops on zero candidates,
/// not zero accepted records.
#[derive(Debug)]
pub struct PageHarvest {
    pub products: Vec<Product>,
    pub candidates: usize,
}

/// Run `site`'s rules over a parsed document, in document order. A candidate
/// that fails its acceptance rule is logged and skipped; it never aborts the
/// rest of the page.
pub fn extract_listing(doc: &Html, site: Site) -> PageHarvest {
    let rules = site.rules();
    let container = match Selector::parse(rules.container) {
        Ok(sel) => sel,
        Err(_) => {
            warn!(selector = rules.container, "container selector failed to parse");
            return PageHarvest {
                products: Vec::new(),
                candidates: 0,
            };
        }
    };

    let mut products = Vec::new();
    let mut candidates = 0usize;
    for element in doc.select(&container) {
        candidates += 1;
        match extract_candidate(&element, site, rules) {
            DraftOutcome::Accepted(product) => products.push(*product),
            DraftOutcome::Rejected(reason) => {
                debug!(site = ?site, ?reason, "skipping candidate");
            }
        }
    }

    debug!(site = ?site, candidates, accepted = products.len(), "page extracted");
    PageHarvest {
        products,
        candidates,
    }
}

fn extract_candidate(element: &ElementRef, site: Site, rules: &SiteRules) -> DraftOutcome {
    let name = first_text(element, rules.name);

    // A missing or digit-free price is merely an absent field (lenient sites
    // still emit the record). Price text that has digits yet fails to parse
    // means we misread the markup, so the whole candidate is suspect.
    let price = match first_text(element, rules.price) {
        Some(raw) if !strip_price(&raw).is_empty() => match parse_price(&raw) {
            Some(parsed) => Some(parsed),
            None => {
                warn!(site = ?site, raw = %raw, "unparseable price, skipping candidate");
                return DraftOutcome::Rejected(RejectReason::UnparseablePrice);
            }
        },
        _ => None,
    };

    let product_url = first_attr(element, rules.link, "href")
        .map(|href| absolutize(&href, site.origin()));

    ProductDraft::new()
        .name(name)
        .price(price)
        .description(first_text(element, rules.description))
        .image_url(first_attr(element, rules.image, "src"))
        .product_url(product_url)
        .finish(site.label(), site.requires_complete_record())
}

/// First non-empty text under any selector in the chain, whitespace-squashed.
fn first_text(element: &ElementRef, chain: &[&str]) -> Option<String> {
    for raw in chain {
        let Ok(sel) = Selector::parse(raw) else {
            continue;
        };
        if let Some(found) = element.select(&sel).next() {
            let text = squash_whitespace(&found.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First non-empty attribute value under any selector in the chain.
fn first_attr(element: &ElementRef, chain: &[&str], attr: &str) -> Option<String> {
    for raw in chain {
        let Ok(sel) = Selector::parse(raw) else {
            continue;
        };
        if let Some(found) = element.select(&sel).next() {
            if let Some(value) = found.value().attr(attr) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meesho_extracts_complete_candidates_only() {
        let doc = Html::parse_document(
            r#"<html><body>
                <div class="ProductList__GridCol-sc-8lnc8o-0">
                    <img src="https://images.meesho.com/1.webp">
                    <p class="Text__StyledText-sc-oo0kvp-0">Cotton Kurti</p>
                    <h5 class="Text__StyledText-sc-oo0kvp-0">₹449</h5>
                </div>
                <div class="ProductList__GridCol-sc-8lnc8o-0">
                    <p class="Text__StyledText-sc-oo0kvp-0">No Price Item</p>
                </div>
            </body></html>"#,
        );

        let harvest = extract_listing(&doc, Site::Meesho);
        assert_eq!(harvest.candidates, 2);
        assert_eq!(harvest.products.len(), 1);

        let p = &harvest.products[0];
        assert_eq!(p.name.as_deref(), Some("Cotton Kurti"));
        assert_eq!(p.price, Some(449.0));
        assert_eq!(p.image_url.as_deref(), Some("https://images.meesho.com/1.webp"));
        assert_eq!(p.website.as_deref(), Some("Meesho"));
    }

    #[test]
    fn amazon_falls_back_through_name_selectors() {
        // no h2 span.a-text-normal; the second selector in the chain hits
        let doc = Html::parse_document(
            r#"<html><body>
                <div data-component-type="s-search-result">
                    <h2><a class="a-link-normal" href="/dp/B0TEST"><span>Fallback Laptop</span></a></h2>
                    <span class="a-price"><span class="a-offscreen">$599.99</span></span>
                </div>
            </body></html>"#,
        );

        let harvest = extract_listing(&doc, Site::Amazon);
        assert_eq!(harvest.products.len(), 1);

        let p = &harvest.products[0];
        assert_eq!(p.name.as_deref(), Some("Fallback Laptop"));
        assert_eq!(p.price, Some(599.99));
        assert_eq!(
            p.product_url.as_deref(),
            Some("https://www.amazon.com/dp/B0TEST")
        );
    }

    #[test]
    fn walmart_emits_partial_records() {
        let doc = Html::parse_document(
            r#"<html><body>
                <div data-item-id="123">
                    <span class="normal">Storage Shelf</span>
                </div>
            </body></html>"#,
        );

        let harvest = extract_listing(&doc, Site::Walmart);
        assert_eq!(harvest.products.len(), 1);
        assert_eq!(harvest.products[0].name.as_deref(), Some("Storage Shelf"));
        assert_eq!(harvest.products[0].price, None);
    }

    #[test]
    fn ebay_range_price_rejects_candidate() {
        let doc = Html::parse_document(
            r#"<html><body>
                <li class="s-item">
                    <div class="s-item__title">Laptop Lot</div>
                    <span class="s-item__price">$20.99 to $38.11</span>
                </li>
            </body></html>"#,
        );

        let harvest = extract_listing(&doc, Site::Ebay);
        assert_eq!(harvest.candidates, 1);
        assert!(harvest.products.is_empty());
    }

    #[test]
    fn generic_records_carry_no_website_label() {
        let doc = Html::parse_document(
            r#"<html><body>
                <div class="product">
                    <h2>First Widget</h2>
                    <span class="price">$10.00</span>
                    <img src="/img/1.png">
                </div>
                <article class="product">
                    <h2>Second Widget</h2>
                    <span class="price">$11.00</span>
                </article>
                <div class="item">
                    <span class="name">Third Widget</span>
                </div>
            </body></html>"#,
        );

        let harvest = extract_listing(&doc, Site::Generic);
        assert_eq!(harvest.candidates, 3);
        // lenient: the priceless third candidate still comes through
        assert_eq!(harvest.products.len(), 3);
        let names: Vec<_> = harvest
            .products
            .iter()
            .map(|p| p.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, ["First Widget", "Second Widget", "Third Widget"]);
        assert!(harvest.products.iter().all(|p| p.website.is_none()));
    }
}
