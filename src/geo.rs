/// A point in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_meters(self.lat, self.lon, other.lat, other.lon)
    }
}

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance using the haversine formula.
/// Input lat/lon in degrees. Output in meters. Ranges are not checked.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = phi1 - phi2;
    let dlambda = (lon1 - lon2).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_meters(30.58, 114.27, 30.58, 114.27), 0.0);
        assert_eq!(haversine_meters(-89.9, -179.0, -89.9, -179.0), 0.0);
    }

    #[test]
    fn symmetric() {
        let ab = haversine_meters(30.6197, 114.2567, 30.5447, 114.3005);
        let ba = haversine_meters(30.5447, 114.3005, 30.6197, 114.2567);
        assert_relative_eq!(ab, ba, epsilon = 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        // pi * R / 180
        let d = haversine_meters(0.0, 0.0, 1.0, 0.0);
        assert_relative_eq!(d, 111_194.93, epsilon = 0.01);
    }

    #[test]
    fn monotonic_along_meridian() {
        let d1 = haversine_meters(30.0, 114.0, 30.01, 114.0);
        let d2 = haversine_meters(30.0, 114.0, 30.02, 114.0);
        let d3 = haversine_meters(30.0, 114.0, 30.05, 114.0);
        assert!(0.0 < d1 && d1 < d2 && d2 < d3);
    }

    #[test]
    fn nan_propagates() {
        assert!(haversine_meters(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn coordinate_distance_matches_free_function() {
        let a = Coordinate::new(30.6197, 114.2567);
        let b = Coordinate::new(30.5447, 114.3005);
        assert_eq!(a.distance_to(&b), haversine_meters(a.lat, a.lon, b.lat, b.lon));
    }
}
