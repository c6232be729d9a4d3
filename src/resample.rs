//! Nearest-neighbor resampling of magnitude sequences.
//!
//! Index `i` of a length-`T` output reads input index `round(i * (L - 1) / (T - 1))`, rounding
//! half away from zero and clamped to `[0, L - 1]`. Values are never interpolated.

use std::borrow::Cow;

use crate::foundation::error::{BandwaveError, BandwaveResult};

/// Source index for each of `target_len` output slots over an input of `source_len` values.
pub fn nearest_indices(source_len: usize, target_len: usize) -> BandwaveResult<Vec<usize>> {
    if source_len == 0 {
        return Err(BandwaveError::degenerate("cannot resample an empty sequence"));
    }
    if target_len == 0 {
        return Err(BandwaveError::degenerate("resample target length must be > 0"));
    }
    if target_len == 1 {
        return Ok(vec![0]);
    }

    let last = source_len - 1;
    let step = last as f64 / (target_len - 1) as f64;
    Ok((0..target_len)
        .map(|i| ((i as f64 * step).round() as usize).min(last))
        .collect())
}

/// Stretch or compress `values` to `target_len` entries.
///
/// Equal lengths borrow the input untouched.
pub fn resample_nearest(values: &[f64], target_len: usize) -> BandwaveResult<Cow<'_, [f64]>> {
    if values.len() == target_len && target_len > 0 {
        return Ok(Cow::Borrowed(values));
    }
    let indices = nearest_indices(values.len(), target_len)?;
    Ok(Cow::Owned(indices.into_iter().map(|i| values[i]).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_when_lengths_match() {
        let v = vec![1.0, 5.0, 3.0];
        let out = resample_nearest(&v, 3).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), v.as_slice());
    }

    #[test]
    fn single_target_takes_first_value() {
        let out = resample_nearest(&[7.0, 8.0, 9.0], 1).unwrap();
        assert_eq!(out.as_ref(), &[7.0]);
    }

    #[test]
    fn stretch_repeats_nearest_values() {
        let out = resample_nearest(&[1.0, 2.0], 5).unwrap();
        // positions 0, .25, .5, .75, 1 -> round half away from zero
        assert_eq!(out.as_ref(), &[1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn compress_keeps_endpoints() {
        let v: Vec<f64> = (0..10).map(f64::from).collect();
        let out = resample_nearest(&v, 4).unwrap();
        assert_eq!(out.as_ref(), &[0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn indices_stay_in_bounds() {
        for (src, dst) in [(1, 7), (3, 1000), (1000, 3), (17, 16), (16, 17)] {
            let idx = nearest_indices(src, dst).unwrap();
            assert_eq!(idx.len(), dst);
            assert_eq!(idx[0], 0);
            assert!(idx.iter().all(|&i| i < src));
            if dst > 1 {
                assert_eq!(*idx.last().unwrap(), src - 1);
            }
            assert!(idx.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn empty_inputs_are_degenerate() {
        assert!(matches!(
            resample_nearest(&[], 4),
            Err(BandwaveError::DegenerateInput(_))
        ));
        assert!(resample_nearest(&[1.0], 0).is_err());
        assert!(resample_nearest(&[], 0).is_err());
    }
}
