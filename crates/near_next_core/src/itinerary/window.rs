use super::{LocationStore, SearchStats};
use crate::{
    Error, Result,
    constants::{DEFAULT_WINDOW, MAX_WINDOW, MIN_WINDOW},
    geo::DistanceOracle,
};

/// Caller-facing window size `w`; the search looks `w / 2` slots each way.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowSize(usize);

impl WindowSize {
    pub fn new(size: usize) -> Result<Self> {
        if !(MIN_WINDOW..=MAX_WINDOW).contains(&size) {
            return Err(Error::invalid_input(format!(
                "window size {size} outside {MIN_WINDOW}..={MAX_WINDOW}"
            )));
        }
        Ok(Self(size))
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn half_width(self) -> usize {
        self.0 / 2
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self(DEFAULT_WINDOW)
    }
}

/// Nearest unvisited location within `[pivot - h, pivot + h)`.
#[derive(Clone, Copy, Debug)]
pub struct WindowSearch {
    half_width: usize,
}

impl WindowSearch {
    pub fn new(window: WindowSize) -> Self {
        Self::with_half_width(window.half_width())
    }

    /// Unchecked half-width; `usize::MAX` scans the whole store.
    pub fn with_half_width(half_width: usize) -> Self {
        Self { half_width }
    }

    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Clamped `[start, end)` of the window around `pivot` in a store of `len`.
    pub fn bounds(&self, pivot: usize, len: usize) -> (usize, usize) {
        (
            pivot.saturating_sub(self.half_width),
            pivot.saturating_add(self.half_width).min(len),
        )
    }

    /// Returns the unvisited index with the smallest proxy distance to
    /// `pivot`, or `None` if the window has no unvisited slot to offer.
    ///
    /// Candidates are scanned in increasing index order and only a strictly
    /// smaller proxy replaces the best so far, so equal distances resolve to
    /// the lowest index. A NaN proxy is never chosen.
    pub fn search<C, O>(
        &self,
        store: &LocationStore<C>,
        oracle: &O,
        pivot: usize,
        stats: &mut SearchStats,
    ) -> Option<usize>
    where
        O: DistanceOracle<C> + ?Sized,
    {
        stats.window_searches += 1;

        let (start, end) = self.bounds(pivot, store.len());
        let origin = store.coordinate(pivot);
        let mut best: Option<(usize, f64)> = None;

        for (offset, location) in store.locations()[start..end].iter().enumerate() {
            if location.is_visited() {
                continue;
            }
            let proxy = oracle.proxy(origin, location.coordinate());
            if best.map_or(!proxy.is_nan(), |(_, best_proxy)| proxy < best_proxy) {
                best = Some((start + offset, proxy));
            }
        }

        best.map(|(index, _)| index)
    }
}
