//! Per-journey record of visited pages, used for "back".

use serde::{Deserialize, Serialize};

use super::Page;

/// Pages in the order the user actually visited them.
///
/// Back navigation follows this record, not the graph, so a page reachable
/// from several places always returns to the one the user came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationHistory {
    pages: Vec<Page>,
}

impl NavigationHistory {
    /// A history that starts at `first`.
    pub fn starting_at(first: Page) -> Self {
        Self { pages: vec![first] }
    }

    /// Record a visit. Revisiting the current page is a no-op.
    pub fn record_visit(&mut self, page: Page) {
        if self.current() != Some(page) {
            self.pages.push(page);
        }
    }

    /// Step back one page and return the new current page.
    ///
    /// Never pops the first entry.
    pub fn back(&mut self) -> Option<Page> {
        if self.pages.len() > 1 {
            self.pages.pop();
        }
        self.current()
    }

    /// Drop visits to pages `keep` rejects, then collapse the repeats left
    /// behind. The first entry always stays.
    pub fn retain(&mut self, mut keep: impl FnMut(Page) -> bool) {
        let mut first = true;
        self.pages.retain(|page| std::mem::replace(&mut first, false) || keep(*page));
        self.pages.dedup();
    }

    pub fn current(&self) -> Option<Page> {
        self.pages.last().copied()
    }

    /// Where "back" would go, without moving.
    pub fn previous(&self) -> Option<Page> {
        match self.pages.len() {
            0 | 1 => None,
            n => Some(self.pages[n - 2]),
        }
    }

    pub fn contains(&self, page: Page) -> bool {
        self.pages.contains(&page)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
}
