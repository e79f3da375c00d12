/// Euclidean norm.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scales `v` to unit length in place. A zero vector is left as is.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = l2_norm(v);
    let norm = if norm == 0.0 { 1.0 } else { norm };
    for x in v.iter_mut() {
        *x /= norm;
    }
}

/// Cosine similarity of two unit vectors, i.e. their dot product over the
/// shared prefix.
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_yields_unit_length() {
        let mut v = vec![1.0f32, 2.0, 3.0, 4.0];
        l2_normalize(&mut v);
        let norm: f32 = (1.0f32 * 1.0 + 2.0 * 2.0 + 3.0 * 3.0 + 4.0 * 4.0).sqrt();
        let expected = [1.0 / norm, 2.0 / norm, 3.0 / norm, 4.0 / norm];
        for (a, b) in v.iter().cloned().zip(expected) {
            assert!((a - b).abs() < 1e-6, "a={} b={}", a, b);
        }
    }

    #[test]
    fn zero_vector_is_untouched() {
        let mut v = vec![0.0f32; 8];
        l2_normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn cosine_of_orthogonal_and_mismatched_lengths() {
        assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine(&[0.6, 0.8, 5.0], &[0.6, 0.8]) - 1.0).abs() < 1e-6);
    }
}
