//! Slicing result sets into fixed-size pages.

use serde::Serialize;

use crate::Error;

/// Identifies one page of a result set: a page size and a 1-based page
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    size: usize,
    number: usize,
}

impl PageWindow {
    /// Constructor. Fails if `size` is zero.
    ///
    /// Page numbers are not validated here: a number past the last page (or
    /// zero) simply selects an empty page.
    pub fn new(size: usize, number: usize) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::InvalidPageSize(0));
        }
        Ok(Self { size, number })
    }

    /// The first page of the given size.
    pub fn first(size: usize) -> Result<Self, Error> {
        Self::new(size, 1)
    }

    /// Constructor for signed input, such as command line arguments. Sizes
    /// below one are rejected. Page numbers below one are out of range.
    pub fn from_signed(size: i64, number: i64) -> Result<Self, Error> {
        let size = usize::try_from(size)
            .ok()
            .filter(|s| *s > 0)
            .ok_or(Error::InvalidPageSize(size))?;
        Self::new(size, usize::try_from(number).unwrap_or(0))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// The same size, positioned on another page.
    pub fn with_number(self, number: usize) -> Self {
        Self { number, ..self }
    }
}

/// A single page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// The page before this one, clamped to the first page.
    pub fn previous(&self) -> usize {
        self.number.saturating_sub(1).clamp(1, self.total_pages)
    }

    /// The page after this one, clamped to the last page.
    pub fn next(&self) -> usize {
        self.number.saturating_add(1).clamp(1, self.total_pages)
    }

    /// The compact navigation strip for this page. See [`page_links`].
    pub fn links(&self) -> Vec<PageLink> {
        page_links(self.number, self.total_pages)
    }
}

/// The number of pages needed for `count` items. An empty result set still
/// has one (empty) page.
pub fn total_pages(count: usize, size: usize) -> usize {
    if size == 0 {
        return 1;
    }
    (count / size + usize::from(count % size != 0)).max(1)
}

/// Extract the page selected by `window` from `items`.
///
/// Concatenating pages `1..=total_pages` gives back `items` unchanged. Pages
/// outside that range are empty.
pub fn paginate<T: Clone>(items: &[T], window: PageWindow) -> Page<T> {
    let total = total_pages(items.len(), window.size);
    let page_items = match window.number.checked_sub(1) {
        Some(idx) if window.number <= total => {
            let start = idx * window.size;
            let end = start.saturating_add(window.size).min(items.len());
            items[start..end].to_vec()
        }
        _ => Vec::new(),
    };
    Page {
        items: page_items,
        number: window.number,
        size: window.size,
        total_pages: total,
        total_items: items.len(),
    }
}

/// One entry of a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PageLink {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// Build a compact list of page links: the first and last pages are always
/// shown, as are the pages immediately around `current`. Page 2 and the
/// second-to-last page collapse into an ellipsis when hidden.
pub fn page_links(current: usize, total_pages: usize) -> Vec<PageLink> {
    let mut links = Vec::new();
    for number in 1..=total_pages {
        let near_current = number + 1 >= current && number <= current.saturating_add(1);
        if number == 1 || number == total_pages || near_current {
            links.push(PageLink::Page {
                number,
                current: number == current,
            });
        } else if number == 2 || number + 1 == total_pages {
            links.push(PageLink::Ellipsis);
        }
    }
    links
}

#[cfg(test)]
mod test {
    use super::*;

    fn page(number: usize, current: bool) -> PageLink {
        PageLink::Page { number, current }
    }

    #[test]
    fn four_items_two_per_page() {
        let items = ["A", "B", "C", "D"];
        let window = PageWindow::first(2).unwrap();
        let p1 = paginate(&items, window);
        assert_eq!(p1.total_pages, 2);
        assert_eq!(p1.items, vec!["A", "B"]);
        assert_eq!(paginate(&items, window.with_number(2)).items, vec!["C", "D"]);
        assert!(paginate(&items, window.with_number(3)).items.is_empty());
        assert!(paginate(&items, window.with_number(0)).items.is_empty());
    }

    #[test]
    fn last_page_may_be_short() {
        let items = [1, 2, 3, 4, 5];
        let p = paginate(&items, PageWindow::new(2, 3).unwrap());
        assert_eq!(p.items, vec![5]);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.total_items, 5);
    }

    #[test]
    fn empty_input_is_one_empty_page() {
        let items: [u8; 0] = [];
        let p = paginate(&items, PageWindow::first(4).unwrap());
        assert_eq!(p.total_pages, 1);
        assert!(p.items.is_empty());
        assert!(!p.has_next());
        assert!(!p.has_previous());
    }

    #[test]
    fn page_size_must_be_positive() {
        assert!(matches!(
            PageWindow::new(0, 1),
            Err(Error::InvalidPageSize(0))
        ));
        assert!(matches!(
            PageWindow::from_signed(-3, 1),
            Err(Error::InvalidPageSize(-3))
        ));
        assert_eq!(
            PageWindow::from_signed(4, -1).unwrap(),
            PageWindow::new(4, 0).unwrap()
        );
    }

    #[test]
    fn huge_page_size_holds_everything() {
        let p = paginate(&[1, 2, 3], PageWindow::new(usize::MAX, 1).unwrap());
        assert_eq!(p.items, vec![1, 2, 3]);
        assert_eq!(p.total_pages, 1);
        assert_eq!(total_pages(5, usize::MAX), 1);
        assert_eq!(total_pages(usize::MAX, 2), usize::MAX / 2 + 1);
        assert!(paginate(&[1, 2, 3], PageWindow::new(usize::MAX, 2).unwrap())
            .items
            .is_empty());
    }

    #[test]
    fn neighbours_are_clamped() {
        let items = [1, 2, 3, 4, 5, 6];
        let first = paginate(&items, PageWindow::first(2).unwrap());
        assert_eq!(first.previous(), 1);
        assert_eq!(first.next(), 2);
        let last = paginate(&items, PageWindow::new(2, 3).unwrap());
        assert_eq!(last.previous(), 2);
        assert_eq!(last.next(), 3);
        assert!(!last.has_next());
    }

    #[test]
    fn links_collapse_far_pages() {
        use PageLink::Ellipsis;
        assert_eq!(
            page_links(5, 10),
            vec![
                page(1, false),
                Ellipsis,
                page(4, false),
                page(5, true),
                page(6, false),
                Ellipsis,
                page(10, false),
            ]
        );
        assert_eq!(
            page_links(1, 5),
            vec![page(1, true), page(2, false), Ellipsis, page(5, false)]
        );
        assert_eq!(
            page_links(2, 3),
            vec![page(1, false), page(2, true), page(3, false)]
        );
        assert_eq!(page_links(1, 1), vec![page(1, true)]);
    }
}
