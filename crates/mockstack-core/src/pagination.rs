//! Name-token pagination for name-sorted listings.
//!
//! The token handed back to a caller is the *name of the first item past the
//! returned page*, not an opaque offset. Resuming scans for that name; a token
//! that no longer matches any item (the item was deleted, or the token is
//! stale) restarts the listing from the beginning instead of failing.
//!
//! Tokens are a soft hint: an item inserted exactly at a page boundary between
//! two calls may be skipped or delivered twice.

use tracing::debug;

/// One page of a name-token paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in this page, in listing order.
    pub items: Vec<T>,
    /// Name of the first item after this page, if any remain.
    pub next_token: Option<String>,
}

/// Find the index a listing should resume from.
///
/// Returns the position of the first item whose name equals `token`, or `0`
/// when `token` is `None` or matches nothing.
///
/// # Examples
///
/// ```
/// use mockstack_core::find_start_index;
///
/// let names = ["alpha", "bravo", "charlie"];
/// assert_eq!(find_start_index(&names, Some("bravo"), |n| *n), 1);
/// assert_eq!(find_start_index(&names, Some("zulu"), |n| *n), 0);
/// assert_eq!(find_start_index(&names, None, |n| *n), 0);
/// ```
pub fn find_start_index<T>(items: &[T], token: Option<&str>, name: impl Fn(&T) -> &str) -> usize {
    let Some(token) = token else {
        return 0;
    };
    if let Some(idx) = items.iter().position(|item| name(item) == token) {
        idx
    } else {
        debug!(token, "pagination token not found, restarting listing");
        0
    }
}

/// Cut one page out of `items`.
///
/// The page starts at [`find_start_index`] for `token` and holds at most
/// `max_items` entries. `next_token` is set to the name of the item that
/// follows the page.
///
/// # Examples
///
/// ```
/// use mockstack_core::paginate;
///
/// let names = vec!["a", "b", "c", "d", "e"];
/// let first = paginate(&names, None, 2, |n| *n);
/// assert_eq!(first.items, vec!["a", "b"]);
/// assert_eq!(first.next_token.as_deref(), Some("c"));
///
/// let second = paginate(&names, first.next_token.as_deref(), 2, |n| *n);
/// assert_eq!(second.items, vec!["c", "d"]);
/// ```
pub fn paginate<T: Clone>(
    items: &[T],
    token: Option<&str>,
    max_items: usize,
    name: impl Fn(&T) -> &str,
) -> Page<T> {
    let start = find_start_index(items, token, &name);
    let end = start.saturating_add(max_items).min(items.len());
    let next_token = items.get(end).map(|item| name(item).to_owned());

    Page {
        items: items[start..end].to_vec(),
        next_token,
    }
}
