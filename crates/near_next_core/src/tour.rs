use near_next_derive::New;

use crate::{constants::METERS_TO_NAUTICAL_MILES, geo::DistanceOracle};

/// Coordinates in visiting order.
#[derive(Debug, Default, New)]
pub struct Tour<C> {
    pub points: Vec<C>,
}

impl<C> Tour<C> {
    /// Leg statistics of the open tour, measured with `oracle`'s true distance.
    pub fn metrics<O>(&self, oracle: &O) -> TourMetrics
    where
        O: DistanceOracle<C> + ?Sized,
    {
        let n = self.n();
        if n < 2 {
            log::debug!("metrics: n={n} so there are no legs to measure");
            return TourMetrics::default();
        }

        let mut total = 0.0;
        let mut min_leg = f64::INFINITY;
        let mut max_leg = 0.0_f64;
        for pair in self.points.windows(2) {
            let d = oracle.distance(&pair[0], &pair[1]);
            total += d;
            min_leg = min_leg.min(d);
            max_leg = max_leg.max(d);
        }
        let return_leg = oracle.distance(&self.points[n - 1], &self.points[0]);

        let metrics = TourMetrics::new(n - 1, total, min_leg, max_leg, return_leg);
        log::debug!(
            "metrics: legs={} total_m={total:.0} min_m={min_leg:.0} max_m={max_leg:.0} avg_m={:.0} return_m={return_leg:.0}",
            metrics.legs,
            metrics.average_leg()
        );
        metrics
    }

    fn n(&self) -> usize {
        self.points.len()
    }
}

/// Open-tour leg statistics in meters. The closing leg from the last stop
/// back to the first is kept apart from `total`.
#[derive(Clone, Copy, Debug, Default, PartialEq, New)]
pub struct TourMetrics {
    pub legs: usize,
    pub total: f64,
    pub min_leg: f64,
    pub max_leg: f64,
    pub return_leg: f64,
}

impl TourMetrics {
    pub fn closed_total(&self) -> f64 {
        self.total + self.return_leg
    }

    /// `closed_total` when `close_tour` is set, otherwise `total`.
    pub fn reported_total(&self, close_tour: bool) -> f64 {
        if close_tour {
            self.closed_total()
        } else {
            self.total
        }
    }

    pub fn average_leg(&self) -> f64 {
        if self.legs == 0 {
            0.0
        } else {
            self.total / self.legs as f64
        }
    }
}

pub fn nautical_miles(meters: f64) -> f64 {
    meters * METERS_TO_NAUTICAL_MILES
}
