use std::fmt::{self, Write};

use crate::{
    Error, Result,
    geo::{EllipsoidOracle, GeoPoint, SphericalOracle},
    tour::{Tour, TourMetrics, nautical_miles},
};

/// Leg statistics of a stored itinerary under both Earth models.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TourReport {
    pub records: usize,
    pub sphere: TourMetrics,
    pub ellipsoid: TourMetrics,
}

impl TourReport {
    pub fn measure(tour: &Tour<GeoPoint>) -> Self {
        Self {
            records: tour.points.len(),
            sphere: tour.metrics(&SphericalOracle),
            ellipsoid: tour.metrics(&EllipsoidOracle::default()),
        }
    }

    /// Ellipsoidal over spherical length, 1.0 for a tour with no length.
    pub fn model_ratio(&self) -> f64 {
        if self.sphere.total == 0.0 {
            return 1.0;
        }
        self.ellipsoid.total / self.sphere.total
    }

    /// One `key=value` line per model.
    pub fn render(&self, close_tour: bool) -> Result<String> {
        let mut out = String::new();
        self.write_to(&mut out, close_tour)
            .map_err(|e| Error::other(format!("report format failed: {e}")))?;
        Ok(out)
    }

    fn write_to(&self, out: &mut String, close_tour: bool) -> fmt::Result {
        writeln!(
            out,
            "records={} legs={} model_ratio={:.6}",
            self.records,
            self.sphere.legs,
            self.model_ratio()
        )?;
        for (model, metrics) in [("sphere", &self.sphere), ("ellipsoid", &self.ellipsoid)] {
            let total = metrics.reported_total(close_tour);
            writeln!(
                out,
                "model={model} total_m={total:.1} total_nm={:.3} min_m={:.1} max_m={:.1} avg_m={:.1} return_m={:.1} return_nm={:.3} closed={close_tour}",
                nautical_miles(total),
                metrics.min_leg,
                metrics.max_leg,
                metrics.average_leg(),
                metrics.return_leg,
                nautical_miles(metrics.return_leg),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TourReport;
    use crate::{geo::GeoPoint, tour::Tour};

    fn equator_tour() -> Tour<GeoPoint> {
        Tour::new(
            [(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]
                .into_iter()
                .map(|(lat, lng)| GeoPoint::from_lat_lng(lat, lng).expect("point"))
                .collect(),
        )
    }

    #[test]
    fn both_models_measure_the_same_legs() {
        let report = TourReport::measure(&equator_tour());
        assert_eq!(report.records, 3);
        assert_eq!(report.sphere.legs, 2);
        assert_eq!(report.ellipsoid.legs, 2);

        // One degree of longitude on the equator: 111.195 km on the sphere,
        // 111.319 km on WGS84.
        assert!((report.sphere.total - 222_390.0).abs() < 50.0);
        assert!((report.ellipsoid.total - 222_639.0).abs() < 50.0);
        assert!((report.sphere.return_leg - report.sphere.total).abs() < 5.0);
    }

    #[test]
    fn render_lists_each_model() {
        let text = TourReport::measure(&equator_tour())
            .render(true)
            .expect("render");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("records=3 legs=2 model_ratio=1.00"));
        assert!(lines[1].starts_with("model=sphere total_m="));
        assert!(lines[2].starts_with("model=ellipsoid total_m="));
        assert!(lines[2].ends_with("closed=true"));
    }

    #[test]
    fn ratio_is_one_without_length() {
        let tour = Tour::new(vec![GeoPoint::from_lat_lng(10.0, 10.0).expect("point")]);
        assert_eq!(TourReport::measure(&tour).model_ratio(), 1.0);

        let ratio = TourReport::measure(&equator_tour()).model_ratio();
        assert!(ratio > 1.0 && ratio < 1.01);
    }
}
