//! Page-selector window: which page numbers (and ellipsis gaps) to show
//! for the current position in a paged result set.

/// Number of pages kept on each side of the current page once the
/// selector has to truncate.
const SIBLINGS: u64 = 1;

/// Below this many pages every page number is shown outright.
const FULL_WINDOW_MAX: u64 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageToken {
    Page(u64),
    Ellipsis,
}

/// Total page count for `total` items at `page_size` per page, never zero.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    ((total + page_size - 1) / page_size).max(1)
}

/// Tokens to render as page-selector buttons for `current` of `total`
/// pages. Whenever the output is truncated it starts with page 1, ends
/// with the last page, and an ellipsis never sits next to the page it
/// would elide.
pub fn page_window(current: u64, total: u64) -> Vec<PageToken> {
    let total = total.max(1);
    let current = current.clamp(1, total);

    if total <= FULL_WINDOW_MAX {
        return (1..=total).map(PageToken::Page).collect();
    }

    let left_sibling = current.saturating_sub(SIBLINGS).max(1);
    let right_sibling = (current + SIBLINGS).min(total);
    let left_dots = left_sibling > 2;
    let right_dots = right_sibling < total - 1;

    // Window touching one edge absorbs the ellipsis on that side and shows
    // a fixed run of 3 + 2*SIBLINGS pages instead.
    let edge_count = 3 + 2 * SIBLINGS;

    if !left_dots && right_dots {
        let mut tokens: Vec<PageToken> = (1..=edge_count).map(PageToken::Page).collect();
        tokens.push(PageToken::Ellipsis);
        tokens.push(PageToken::Page(total));
        tokens
    } else if left_dots && !right_dots {
        let mut tokens = vec![PageToken::Page(1), PageToken::Ellipsis];
        tokens.extend((total - edge_count + 1..=total).map(PageToken::Page));
        tokens
    } else {
        let mut tokens = vec![PageToken::Page(1), PageToken::Ellipsis];
        tokens.extend((left_sibling..=right_sibling).map(PageToken::Page));
        tokens.push(PageToken::Ellipsis);
        tokens.push(PageToken::Page(total));
        tokens
    }
}
