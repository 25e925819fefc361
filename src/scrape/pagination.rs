//! Page counting and listing URLs.

use scraper::Html;
use url::Url;

use crate::extract::element_text;
use crate::extract::selectors::LAST_PAGE_LINK;

/// Last page index shown in the pagination control.
///
/// Returns 0 when the listing has no pagination links (single page) or the
/// last link has no leading number.
pub fn page_count(document: &Html) -> u32 {
    let Some(link) = document.select(&LAST_PAGE_LINK).next() else {
        return 0;
    };

    let text = element_text(link);
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// URL of the first listing page: the category appended to the site root.
///
/// Leading slashes on the category are ignored so it always stays under the
/// site path.
pub fn listing_url(site_url: &Url, category: &str) -> Result<Url, url::ParseError> {
    site_url.join(category.trim_start_matches('/'))
}

/// URL of listing page `page` (2 and up).
pub fn page_url(listing_url: &Url, page: u32) -> Url {
    let mut url = listing_url.clone();
    url.set_query(Some(&format!("page={}", page)));
    url
}
