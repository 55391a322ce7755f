use glam::Vec3;

pub const EPSILON: f32 = 1e-4;

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    a + b
}

#[inline]
pub fn scale(v: Vec3, k: f32) -> Vec3 {
    v * k
}

/// Unit vector in the direction of `v`. A zero-length input is returned unchanged.
pub fn normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len == 0.0 { v } else { v / len }
}

pub fn lerp(min: f32, max: f32, t: f32) -> f32 {
    min + (max - min) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_unit_length() {
        let n = normalize(Vec3::new(3.0, 0.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_is_noop() {
        assert_eq!(normalize(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn add_and_scale() {
        let v = add(Vec3::new(1.0, 2.0, 3.0), scale(Vec3::ONE, 2.0));
        assert_eq!(v, Vec3::new(3.0, 4.0, 5.0));
    }
}
