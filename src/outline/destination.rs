//! Page destination codec.
//!
//! A destination token is the textual fragment `#page=<N>&view=Fit`: open
//! page `N` (1-based) zoomed to fit the window. No other destination kinds
//! are produced, and only the page fragment is read back.

use crate::error::{Error, Result};
use crate::model::DestinationToken;

/// Fragment that introduces the page number.
pub const PAGE_FRAGMENT: &str = "#page=";

/// View directive appended to every encoded token.
pub const FIT_VIEW: &str = "view=Fit";

/// Page number reported for missing or unreadable destinations.
pub const UNKNOWN_PAGE: u32 = 0;

/// Encode a page number as a fit-to-page destination token.
///
/// ```
/// use pdfmarks::outline::destination::{decode, encode};
///
/// let token = encode(12);
/// assert_eq!(token.as_str(), "#page=12&view=Fit");
/// assert_eq!(decode(Some(&token)), 12);
/// ```
pub fn encode(page: u32) -> DestinationToken {
    DestinationToken::new(format!("{}{}&{}", PAGE_FRAGMENT, page, FIT_VIEW))
}

/// Decode the page number of a destination token.
///
/// Returns [`UNKNOWN_PAGE`] for a missing token or one without a readable
/// page fragment; a bad destination never aborts outline reading.
pub fn decode(token: Option<&DestinationToken>) -> u32 {
    let Some(token) = token else {
        return UNKNOWN_PAGE;
    };

    match parse_page(token.as_str()) {
        Ok(page) => page,
        Err(e) => {
            log::debug!("{}; using unknown page", e);
            UNKNOWN_PAGE
        }
    }
}

/// Strictly parse the page number out of a raw destination string.
///
/// Reads the leading digits after the first `#page=`; anything after them
/// (`&view=Fit`, `&zoom=...`) is ignored.
pub fn parse_page(raw: &str) -> Result<u32> {
    let (_, rest) = raw
        .split_once(PAGE_FRAGMENT)
        .ok_or_else(|| Error::MalformedDestination(format!("no page fragment in {:?}", raw)))?;

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];

    if digits.is_empty() {
        return Err(Error::MalformedDestination(format!(
            "no page number in {:?}",
            raw
        )));
    }

    digits
        .parse()
        .map_err(|_| Error::MalformedDestination(format!("page number too large in {:?}", raw)))
}
