use crate::geo::GeoPoint;

use super::Vec3;

/// Spherical <-> Cartesian conversion for the render globe.
///
/// Conventions:
/// - Polar angle from latitude, azimuth from longitude offset by 180 degrees
///   so longitude 0 faces the equirectangular texture seam.
/// - +Y is the north polar axis; the globe rotates around it.
///
/// `to_geo` is the inverse of `to_vector` up to the antimeridian seam (the
/// +180 / -180 meridian is one physical line and comes back as -180) and the
/// poles, where longitude is degenerate.
pub fn to_vector(point: GeoPoint, radius: f64) -> Vec3 {
    let point = GeoPoint::new(point.latitude, point.longitude);
    let phi = (90.0 - point.latitude).to_radians();
    let theta = (point.longitude + 180.0).to_radians();

    let x = -(radius * phi.sin() * theta.cos());
    let z = radius * phi.sin() * theta.sin();
    let y = radius * phi.cos();
    Vec3::new(x, y, z)
}

pub fn to_geo(v: Vec3) -> GeoPoint {
    let r = v.length();
    if r <= 0.0 {
        return GeoPoint::new(0.0, 0.0);
    }

    let phi = (v.y / r).clamp(-1.0, 1.0).acos();
    let latitude = 90.0 - phi.to_degrees();

    let theta = v.z.atan2(-v.x);
    let mut longitude = theta.to_degrees() - 180.0;
    if longitude < -180.0 {
        longitude += 360.0;
    }

    GeoPoint::new(latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::{to_geo, to_vector};
    use crate::geo::GeoPoint;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn north_pole_is_on_the_polar_axis() {
        let v = to_vector(GeoPoint::new(90.0, 0.0), 1.0);
        assert_close(v.x, 0.0, 1e-12);
        assert_close(v.y, 1.0, 1e-12);
        assert_close(v.z, 0.0, 1e-12);
    }

    #[test]
    fn equator_longitude_zero_faces_the_seam() {
        let v = to_vector(GeoPoint::new(0.0, 0.0), 2.0);
        // theta = 180 deg: x = -(r * cos(180)) = r, z = r * sin(180) = 0.
        assert_close(v.x, 2.0, 1e-12);
        assert_close(v.y, 0.0, 1e-12);
        assert_close(v.z, 0.0, 1e-12);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let a = to_vector(GeoPoint::new(95.0, 0.0), 1.0);
        let b = to_vector(GeoPoint::new(90.0, 0.0), 1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn round_trip_recovers_geographic_input() {
        let points = [
            GeoPoint::new(48.8566, 2.3522),
            GeoPoint::new(-33.8688, 151.2093),
            GeoPoint::new(35.6762, 139.6503),
            GeoPoint::new(0.0, -179.5),
            GeoPoint::new(-89.0, 45.0),
        ];
        for radius in [0.5, 1.0, 1.5, 2.2, 6371.0] {
            for p in points {
                let rt = to_geo(to_vector(p, radius));
                assert_close(rt.latitude, p.latitude, 1e-9);
                assert_close(rt.longitude, p.longitude, 1e-9);
            }
        }
    }

    #[test]
    fn antimeridian_comes_back_as_minus_180() {
        let rt = to_geo(to_vector(GeoPoint::new(10.0, 180.0), 1.0));
        assert_close(rt.latitude, 10.0, 1e-9);
        assert_close(rt.longitude, -180.0, 1e-9);
    }
}
