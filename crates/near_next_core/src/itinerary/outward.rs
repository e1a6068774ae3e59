use super::{LocationStore, SearchStats, WindowSearch, WindowSize};

/// Index-order scan outward from the window edges, used once the window has
/// no unvisited slot left.
///
/// Step `i` tests `start - i` and then `end + i`. With an unclamped window
/// both sit `half_width + i` slots from the pivot, so the scan returns the
/// unvisited location nearest by index, the lower side winning ties.
#[derive(Clone, Copy, Debug)]
pub struct OutwardFallbackSearch {
    window: WindowSearch,
}

impl OutwardFallbackSearch {
    pub fn new(window: WindowSize) -> Self {
        Self::with_half_width(window.half_width())
    }

    pub fn with_half_width(half_width: usize) -> Self {
        Self {
            window: WindowSearch::with_half_width(half_width),
        }
    }

    /// `None` means no unvisited location remains anywhere in the store.
    pub fn search<C>(
        &self,
        store: &LocationStore<C>,
        pivot: usize,
        stats: &mut SearchStats,
    ) -> Option<usize> {
        stats.outward_searches += 1;

        let len = store.len();
        let (start, end) = self.window.bounds(pivot, len);
        let mut low = Some(start);
        let mut high = end;

        while low.is_some() || high < len {
            if let Some(index) = low {
                if !store.is_visited(index) {
                    return Some(index);
                }
                low = index.checked_sub(1);
            }
            if high < len {
                if !store.is_visited(high) {
                    return Some(high);
                }
                high += 1;
            }
        }

        None
    }
}
