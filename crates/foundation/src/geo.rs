/// Geographic position in degrees.
///
/// The sole currency for geographic input/output across the workspace.
/// Constructors clamp out-of-range input rather than rejecting it, so a
/// `GeoPoint` is always valid: latitude in [-90, 90], longitude in
/// [-180, 180].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: longitude.clamp(-180.0, 180.0),
        }
    }

    /// The `(0, 0)` "no location" sentinel stored by backends that require a
    /// coordinate pair even when none was captured.
    pub fn is_null_island(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;

    #[test]
    fn clamps_out_of_range_input() {
        let p = GeoPoint::new(123.0, -500.0);
        assert_eq!(p.latitude, 90.0);
        assert_eq!(p.longitude, -180.0);
    }

    #[test]
    fn keeps_valid_input() {
        let p = GeoPoint::new(48.8566, 2.3522);
        assert_eq!(p.latitude, 48.8566);
        assert_eq!(p.longitude, 2.3522);
    }

    #[test]
    fn null_island_sentinel() {
        assert!(GeoPoint::new(0.0, 0.0).is_null_island());
        assert!(!GeoPoint::new(0.0, 0.1).is_null_island());
    }
}
