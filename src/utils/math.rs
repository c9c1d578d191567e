//! Additional math helpers layered on top of `glam`.

use glam::Vec3;

/// Splits a vector into its unit direction and length, `None` for (near) zero vectors.
pub fn direction_and_length(v: Vec3) -> Option<(Vec3, f32)> {
    let length = v.length();
    if length <= f32::EPSILON || !length.is_finite() {
        return None;
    }
    Some((v / length, length))
}

/// Cosine of the angle between two vectors, `None` if either is degenerate.
pub fn cos_angle(a: Vec3, b: Vec3) -> Option<f32> {
    let (da, _) = direction_and_length(a)?;
    let (db, _) = direction_and_length(b)?;
    Some(da.dot(db).clamp(-1.0, 1.0))
}

/// Flattens points into an `xyzxyz...` buffer.
pub fn flatten(points: &[Vec3]) -> Vec<f32> {
    let mut out = Vec::with_capacity(points.len() * 3);
    for p in points {
        out.extend_from_slice(&p.to_array());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_has_no_direction() {
        assert!(direction_and_length(Vec3::ZERO).is_none());
        let (dir, len) = direction_and_length(Vec3::new(0.0, 3.0, 4.0)).expect("direction");
        assert!((len - 5.0).abs() < 1e-6);
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors_have_negative_cosine() {
        let cos = cos_angle(Vec3::X, -Vec3::X * 2.0).expect("cosine");
        assert!((cos + 1.0).abs() < 1e-6);
    }
}
