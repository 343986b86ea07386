/// Axis-aligned bounding boxes
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb3 {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb3 { min, max }
    }

    /// Cube of half-extent `r` centered on `center`.
    pub fn around(center: [f64; 3], r: f64) -> Self {
        Aabb3 {
            min: [center[0] - r, center[1] - r, center[2] - r],
            max: [center[0] + r, center[1] + r, center[2] + r],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb3;

    #[test]
    fn around_builds_symmetric_box() {
        let b = Aabb3::around([1.0, 2.0, 3.0], 0.5);
        assert_eq!(b.min, [0.5, 1.5, 2.5]);
        assert_eq!(b.max, [1.5, 2.5, 3.5]);
    }
}
