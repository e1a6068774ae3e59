use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use super::{LocationStore, OutwardFallbackSearch, WindowSearch, WindowSize};
use crate::{Error, Result, constants::PROGRESS_INTERVAL, geo::DistanceOracle};

/// Counters for one construction run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchStats {
    pub window_searches: usize,
    pub outward_searches: usize,
    pub elapsed: Duration,
}

impl SearchStats {
    /// Stops found inside the window.
    pub fn window_hits(&self) -> usize {
        self.window_searches - self.outward_searches
    }
}

/// Builds the itinerary: each stop is the nearest unvisited location to the
/// previous one, searched inside the window first and by index order outside
/// it when the window is used up.
pub struct ItineraryDriver<'a, O: ?Sized> {
    oracle: &'a O,
    window: WindowSearch,
    outward: OutwardFallbackSearch,
    cancel: Option<&'a AtomicBool>,
}

impl<'a, O: ?Sized> ItineraryDriver<'a, O> {
    pub fn new(oracle: &'a O, window: WindowSize) -> Self {
        Self {
            oracle,
            window: WindowSearch::new(window),
            outward: OutwardFallbackSearch::new(window),
            cancel: None,
        }
    }

    /// Every remaining location is a candidate at every step, O(N²).
    pub fn brute_force(oracle: &'a O) -> Self {
        Self::with_half_width(oracle, usize::MAX)
    }

    /// Skips [`WindowSize`] validation.
    pub fn with_half_width(oracle: &'a O, half_width: usize) -> Self {
        Self {
            oracle,
            window: WindowSearch::with_half_width(half_width),
            outward: OutwardFallbackSearch::with_half_width(half_width),
            cancel: None,
        }
    }

    /// Checked before each stop; once set, `run` fails with [`Error::Cancelled`].
    pub fn with_cancel(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn half_width(&self) -> usize {
        self.window.half_width()
    }

    /// Assigns visit orders `0..N` to every location of a fresh store,
    /// starting at `start`.
    pub fn run<C>(&self, store: &mut LocationStore<C>, start: usize) -> Result<SearchStats>
    where
        O: DistanceOracle<C>,
    {
        let n = store.len();
        let mut stats = SearchStats::default();
        if n == 0 {
            return Ok(stats);
        }
        if start >= n {
            return Err(Error::invalid_input(format!(
                "start index {start} outside 0..{n}"
            )));
        }
        if store.visited_count() != 0 {
            return Err(Error::invariant(format!(
                "itinerary: store already has {} visited locations",
                store.visited_count()
            )));
        }

        let started = Instant::now();
        store.visit(start, 0)?;
        let mut pivot = start;
        let mut k = 1;

        while k < n {
            if self.cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                log::warn!("itinerary: cancelled at stations={k} of n={n}");
                return Err(Error::Cancelled);
            }
            if k % PROGRESS_INTERVAL == 0 {
                log::trace!("itinerary: stations={k}");
            }

            let next = match self.window.search(store, self.oracle, pivot, &mut stats) {
                Some(next) => next,
                None => self.outward.search(store, pivot, &mut stats).ok_or_else(|| {
                    log::error!(
                        "itinerary: no unvisited location left k={k} n={n} pivot={pivot} visited={}",
                        store.visited_count()
                    );
                    Error::invariant(format!(
                        "outward search exhausted with {k} of {n} locations visited"
                    ))
                })?,
            };

            store.visit(next, k)?;
            k += 1;
            pivot = next;
        }

        stats.elapsed = started.elapsed();
        log::debug!(
            "itinerary: n={n} half_width={} window_hits={} outward={} time={:.3}s",
            self.half_width(),
            stats.window_hits(),
            stats.outward_searches,
            stats.elapsed.as_secs_f64()
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::ItineraryDriver;
    use crate::{
        Error,
        itinerary::{LocationStore, WindowSize, window::tests::LineOracle},
    };

    fn orders(store: &LocationStore<f64>) -> Vec<usize> {
        store
            .locations()
            .iter()
            .map(|l| l.order().expect("every location visited"))
            .collect()
    }

    fn random_store(rng: &mut StdRng, n: usize) -> LocationStore<f64> {
        LocationStore::from_coordinates((0..n).map(|_| rng.random_range(0..1_000) as f64))
    }

    #[test]
    fn narrow_window_falls_back_at_every_step() {
        let mut store = LocationStore::from_coordinates([10.0, 1.0, 2.0, 9.0, 8.0]);

        let stats = ItineraryDriver::with_half_width(&LineOracle, 1)
            .run(&mut store, 0)
            .expect("run");

        assert_eq!(orders(&store), vec![0, 1, 2, 3, 4]);
        assert_eq!(stats.window_searches, 4);
        assert_eq!(stats.outward_searches, 4);
        assert_eq!(stats.window_hits(), 0);
    }

    #[test]
    fn wide_window_follows_nearest_neighbors() {
        let mut store = LocationStore::from_coordinates([10.0, 1.0, 2.0, 9.0, 8.0]);

        let stats = ItineraryDriver::with_half_width(&LineOracle, 8)
            .run(&mut store, 0)
            .expect("run");

        // 10 -> 9 -> 8 -> 2 -> 1
        assert_eq!(orders(&store), vec![0, 4, 3, 1, 2]);
        assert_eq!(stats.window_hits(), 4);
        assert_eq!(stats.outward_searches, 0);
    }

    #[test]
    fn single_location_needs_no_search() {
        let mut store = LocationStore::from_coordinates([3.0]);
        let stats = ItineraryDriver::with_half_width(&LineOracle, 8)
            .run(&mut store, 0)
            .expect("run");
        assert_eq!(orders(&store), vec![0]);
        assert_eq!(stats.window_searches, 0);
    }

    #[test]
    fn empty_store_is_a_no_op() {
        let mut store = LocationStore::<f64>::from_coordinates([]);
        let stats = ItineraryDriver::new(&LineOracle, WindowSize::default())
            .run(&mut store, 0)
            .expect("run");
        assert_eq!(stats.window_searches, 0);
    }

    #[test]
    fn orders_form_a_permutation_for_any_window_and_start() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let n: usize = rng.random_range(1..300);
            let mut store = random_store(&mut rng, n);
            let start = rng.random_range(0..n);
            let half_width: usize = rng.random_range(0..40);

            ItineraryDriver::with_half_width(&LineOracle, half_width)
                .run(&mut store, start)
                .expect("run");

            let mut seen = orders(&store);
            assert_eq!(seen[start], 0);
            seen.sort_unstable();
            assert_eq!(seen, (0..n).collect::<Vec<_>>());
            assert_eq!(store.visited_count(), n);
        }
    }

    #[test]
    fn reruns_are_identical() {
        let mut rng = StdRng::seed_from_u64(5);
        let store = random_store(&mut rng, 500);
        let driver = ItineraryDriver::new(&LineOracle, WindowSize::new(16).expect("window"));

        let mut first = store.clone();
        let mut second = store;
        let a = driver.run(&mut first, 0).expect("run");
        let b = driver.run(&mut second, 0).expect("run");

        assert_eq!(orders(&first), orders(&second));
        assert_eq!(a.outward_searches, b.outward_searches);
    }

    #[test]
    fn window_covering_everything_equals_brute_force() {
        let mut rng = StdRng::seed_from_u64(99);
        let store = random_store(&mut rng, 120);

        let mut windowed = store.clone();
        let mut brute = store;
        ItineraryDriver::with_half_width(&LineOracle, 120)
            .run(&mut windowed, 0)
            .expect("run");
        let stats = ItineraryDriver::brute_force(&LineOracle)
            .run(&mut brute, 0)
            .expect("run");

        assert_eq!(orders(&windowed), orders(&brute));
        assert_eq!(stats.outward_searches, 0);
    }

    #[test]
    fn start_outside_the_store_is_rejected() {
        let mut store = LocationStore::from_coordinates([1.0, 2.0]);
        let err = ItineraryDriver::brute_force(&LineOracle)
            .run(&mut store, 2)
            .expect_err("start out of range");
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn previously_visited_store_is_an_invariant_violation() {
        let mut store = LocationStore::from_coordinates([1.0, 2.0, 3.0]);
        store.visit(1, 0).expect("visit");
        let err = ItineraryDriver::brute_force(&LineOracle)
            .run(&mut store, 0)
            .expect_err("dirty store");
        assert!(matches!(err, Error::Invariant(_)));
    }

    #[test]
    fn cancellation_stops_before_the_next_stop() {
        let cancel = AtomicBool::new(true);
        let mut store = LocationStore::from_coordinates([1.0, 2.0, 3.0]);
        let err = ItineraryDriver::brute_force(&LineOracle)
            .with_cancel(&cancel)
            .run(&mut store, 0)
            .expect_err("cancelled");
        assert!(matches!(err, Error::Cancelled));
        assert_eq!(store.visited_count(), 1);
    }
}
