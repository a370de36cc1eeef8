//! Listing page parser
//!
//! Parses the paginated search results page. Each summary element is turned
//! into a [`ListingItem`] independently; a missing sub-element yields the
//! sentinel rather than an error.

use reqwest::Url;
use scraper::{ElementRef, Html};

use super::{element_text, selector};
use crate::error::{ExtractError, Result};
use crate::types::{ListingItem, NOT_AVAILABLE};

/// One summary element per movie on the listing page
const ITEM_SELECTOR: &str = ".ipc-metadata-list-summary-item";
const TITLE_SELECTOR: &str = "h3";
/// First span is the year, second the coarse duration
const METADATA_SELECTOR: &str = ".dli-title-metadata span";
const PLOT_RICH_SELECTOR: &str = ".ipc-html-content-inner-div";
const PLOT_ATTR_SELECTOR: &str = "[data-testid=\"plot\"]";
const LINK_SELECTOR: &str = "a.ipc-title-link-wrapper";

/// Parse every summary element on a listing page.
///
/// The outer `Result` fails only when the page itself cannot be queried.
/// Each inner `Result` belongs to one item, so a malformed item can be
/// skipped without losing its siblings. An empty vector means the catalog
/// has no more results.
///
/// # Arguments
/// * `html` - Raw HTML of the listing page
/// * `base` - Site origin used to resolve relative detail links
pub fn parse_listing_page(html: &str, base: &Url) -> Result<Vec<Result<ListingItem>>> {
    let document = Html::parse_document(html);
    let items_selector = selector(ITEM_SELECTOR)?;

    Ok(document
        .select(&items_selector)
        .map(|element| parse_listing_item(&element, base))
        .collect())
}

/// Parse a single listing summary element.
///
/// # Returns
/// * `Ok(ListingItem)` with every absent field set to `"N/A"` and
///   `detail_url` set to `None` when there is no title link
/// * `Err(ExtractError::ItemExtraction)` if the title link cannot be
///   resolved against `base`
pub fn parse_listing_item(element: &ElementRef, base: &Url) -> Result<ListingItem> {
    let title = first_text(element, TITLE_SELECTOR)?;

    let metadata_selector = selector(METADATA_SELECTOR)?;
    let mut metadata = element.select(&metadata_selector).map(|el| element_text(&el));
    let release_year = metadata.next().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let duration = metadata.next().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let plot_summary = extract_plot(element)?;

    let link_selector = selector(LINK_SELECTOR)?;
    let detail_url = match element
        .select(&link_selector)
        .next()
        .and_then(|link| link.value().attr("href"))
    {
        Some(href) if !href.trim().is_empty() => Some(resolve_detail_url(base, href.trim())?),
        _ => None,
    };

    Ok(ListingItem {
        title,
        release_year,
        plot_summary,
        duration,
        detail_url,
    })
}

/// Resolve a detail link against the site origin.
///
/// # Examples
/// ```
/// use movies_core::parser::resolve_detail_url;
/// use reqwest::Url;
///
/// let base = Url::parse("https://www.imdb.com").unwrap();
/// assert_eq!(
///     resolve_detail_url(&base, "/title/tt1234567/").unwrap(),
///     "https://www.imdb.com/title/tt1234567/"
/// );
/// ```
pub fn resolve_detail_url(base: &Url, href: &str) -> Result<String> {
    base.join(href)
        .map(|url| url.to_string())
        .map_err(|e| ExtractError::ItemExtraction(format!("unresolvable link {:?}: {}", href, e)))
}

/// Prefer the rich-text plot node, falling back to the plot attribute node.
fn extract_plot(element: &ElementRef) -> Result<String> {
    for css in [PLOT_RICH_SELECTOR, PLOT_ATTR_SELECTOR] {
        let plot_selector = selector(css)?;
        if let Some(el) = element.select(&plot_selector).next() {
            return Ok(element_text(&el));
        }
    }
    Ok(NOT_AVAILABLE.to_string())
}

fn first_text(element: &ElementRef, css: &str) -> Result<String> {
    let sel = selector(css)?;
    Ok(element
        .select(&sel)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE_HTML: &str = r#"
        <html>
          <body>
            <ul>
              <li class="ipc-metadata-list-summary-item">
                <a class="ipc-title-link-wrapper" href="/title/tt1234567/">
                  <h3 class="ipc-title__text">The Test Movie</h3>
                </a>
                <div class="dli-title-metadata">
                  <span>2023</span>
                  <span>2h</span>
                  <span>PG-13</span>
                </div>
                <img src="https://example.com/poster.jpg" />
                <div data-testid="plot">This is a sample plot summary for the movie.</div>
              </li>
            </ul>
          </body>
        </html>
    "#;

    fn base() -> Url {
        Url::parse("https://www.imdb.com").unwrap()
    }

    #[test]
    fn test_parse_listing_page_sample() {
        let items = parse_listing_page(SAMPLE_HTML, &base()).unwrap();
        assert_eq!(items.len(), 1);

        let item = items.into_iter().next().unwrap().unwrap();
        assert_eq!(item.title, "The Test Movie");
        assert_eq!(item.release_year, "2023");
        assert_eq!(item.duration, "2h");
        assert!(item.plot_summary.contains("sample plot"));
        assert_eq!(
            item.detail_url.as_deref(),
            Some("https://www.imdb.com/title/tt1234567/")
        );
    }

    #[test]
    fn test_parse_listing_item_missing_data() {
        let html = r#"<ul><li class="ipc-metadata-list-summary-item"></li></ul>"#;
        let items = parse_listing_page(html, &base()).unwrap();
        let item = items.into_iter().next().unwrap().unwrap();

        assert_eq!(item.title, NOT_AVAILABLE);
        assert_eq!(item.release_year, NOT_AVAILABLE);
        assert_eq!(item.duration, NOT_AVAILABLE);
        assert_eq!(item.plot_summary, NOT_AVAILABLE);
        assert_eq!(item.detail_url, None);
    }

    #[test]
    fn test_parse_listing_item_year_without_duration() {
        let html = r#"
            <ul><li class="ipc-metadata-list-summary-item">
              <h3>Short</h3>
              <div class="dli-title-metadata"><span>1999</span></div>
            </li></ul>
        "#;
        let items = parse_listing_page(html, &base()).unwrap();
        let item = items.into_iter().next().unwrap().unwrap();
        assert_eq!(item.release_year, "1999");
        assert_eq!(item.duration, NOT_AVAILABLE);
    }

    #[test]
    fn test_plot_prefers_rich_text_node() {
        let html = r#"
            <ul><li class="ipc-metadata-list-summary-item">
              <h3>Both Plots</h3>
              <div data-testid="plot">
                <div class="ipc-html-content-inner-div">Rich plot.</div>
              </div>
            </li></ul>
        "#;
        let items = parse_listing_page(html, &base()).unwrap();
        let item = items.into_iter().next().unwrap().unwrap();
        assert_eq!(item.plot_summary, "Rich plot.");
    }

    #[test]
    fn test_empty_link_href_has_no_detail_url() {
        let html = r#"
            <ul><li class="ipc-metadata-list-summary-item">
              <a class="ipc-title-link-wrapper" href=""><h3>No Link</h3></a>
            </li></ul>
        "#;
        let items = parse_listing_page(html, &base()).unwrap();
        let item = items.into_iter().next().unwrap().unwrap();
        assert_eq!(item.detail_url, None);
    }

    #[test]
    fn test_unresolvable_link_is_item_failure() {
        let html = r#"
            <ul>
              <li class="ipc-metadata-list-summary-item">
                <a class="ipc-title-link-wrapper" href="http://[bad/"><h3>Broken</h3></a>
              </li>
              <li class="ipc-metadata-list-summary-item"><h3>Fine</h3></li>
            </ul>
        "#;
        let items = parse_listing_page(html, &base()).unwrap();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Err(ExtractError::ItemExtraction(_))));
        assert_eq!(items[1].as_ref().unwrap().title, "Fine");
    }

    #[test]
    fn test_parse_listing_page_without_items() {
        let items = parse_listing_page("<html><body></body></html>", &base()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_resolve_detail_url_keeps_query() {
        assert_eq!(
            resolve_detail_url(&base(), "/title/tt1/?ref_=sr_t_1").unwrap(),
            "https://www.imdb.com/title/tt1/?ref_=sr_t_1"
        );
    }

    fn expected(raw: &Option<String>) -> String {
        match raw.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    proptest! {
        #[test]
        fn prop_listing_item_parser_is_total(
            title in proptest::option::of("[A-Za-z0-9 ]{0,24}"),
            year in proptest::option::of("[0-9 ]{0,6}"),
            duration in proptest::option::of("[0-9hm ]{0,6}"),
            plot in proptest::option::of("[A-Za-z .]{0,40}"),
            href in proptest::option::of("/title/tt[0-9]{1,8}/"),
        ) {
            let mut html = String::from(r#"<ul><li class="ipc-metadata-list-summary-item">"#);
            if let Some(t) = &title {
                html.push_str(&format!("<h3>{}</h3>", t));
            }
            if let Some(h) = &href {
                html.push_str(&format!(r#"<a class="ipc-title-link-wrapper" href="{}"></a>"#, h));
            }
            if year.is_some() || duration.is_some() {
                html.push_str(r#"<div class="dli-title-metadata">"#);
                html.push_str(&format!("<span>{}</span>", year.clone().unwrap_or_default()));
                if let Some(d) = &duration {
                    html.push_str(&format!("<span>{}</span>", d));
                }
                html.push_str("</div>");
            }
            if let Some(p) = &plot {
                html.push_str(&format!(r#"<div data-testid="plot">{}</div>"#, p));
            }
            html.push_str("</li></ul>");

            let items = parse_listing_page(&html, &base()).unwrap();
            prop_assert_eq!(items.len(), 1);
            let item = items.into_iter().next().unwrap().unwrap();

            prop_assert_eq!(item.title, expected(&title));
            let year_expected = if year.is_some() || duration.is_some() {
                expected(&Some(year.clone().unwrap_or_default()))
            } else {
                NOT_AVAILABLE.to_string()
            };
            prop_assert_eq!(item.release_year, year_expected);
            prop_assert_eq!(item.duration, expected(&duration));
            prop_assert_eq!(item.plot_summary, expected(&plot));
            prop_assert_eq!(item.detail_url.is_some(), href.is_some());
        }
    }
}
