//! Sample handling between the wire and the model.
//!
//! Responsibilities:
//! - Reinterpret a frame payload as little-endian `f32` PCM
//! - Peak-normalize buffers that exceed the `[-1.0, 1.0]` range Whisper expects

use crate::{Error, Result};

const SAMPLE_BYTES: usize = std::mem::size_of::<f32>();

/// Decode a payload of little-endian `f32` samples.
///
/// A payload whose length is not a multiple of four bytes is rejected rather than
/// silently dropping the trailing bytes.
pub fn samples_from_le_bytes(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % SAMPLE_BYTES != 0 {
        return Err(Error::MisalignedPayload { len: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(SAMPLE_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Largest absolute sample value, or `0.0` for an empty buffer.
///
/// NaN samples are ignored.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
}

/// Rescale `samples` by their peak when any sample lies outside `[-1.0, 1.0]`.
///
/// Returns `true` when the buffer was rescaled. Buffers already in range are left
/// untouched, including quiet ones whose peak is well below `1.0`.
pub fn peak_normalize(samples: &mut [f32]) -> bool {
    let peak = peak(samples);
    if peak <= 1.0 {
        return false;
    }

    for s in samples.iter_mut() {
        *s /= peak;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_bytes(samples: &[f32]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn decodes_little_endian_f32() -> anyhow::Result<()> {
        let input = [0.5_f32, -0.25, 1.5, 0.0];
        let decoded = samples_from_le_bytes(&to_bytes(&input))?;
        assert_eq!(decoded, input);
        Ok(())
    }

    #[test]
    fn empty_payload_decodes_to_no_samples() -> anyhow::Result<()> {
        assert!(samples_from_le_bytes(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn rejects_partial_sample() {
        let err = samples_from_le_bytes(&[0, 0, 128, 63, 0]).unwrap_err();
        assert!(matches!(err, Error::MisalignedPayload { len: 5 }));
    }

    #[test]
    fn loud_buffer_is_scaled_to_unit_peak() {
        let mut samples = vec![0.5, -4.0, 2.0, 3.9];
        assert!(peak_normalize(&mut samples));
        assert!((peak(&samples) - 1.0).abs() < f32::EPSILON);
        assert_eq!(samples[1], -1.0);
        assert!((samples[0] - 0.125).abs() < f32::EPSILON);
    }

    #[test]
    fn positive_overshoot_is_scaled_to_unit_peak() {
        let mut samples = vec![0.1, 1.25, -0.3];
        assert!(peak_normalize(&mut samples));
        assert_eq!(samples[1], 1.0);
    }

    #[test]
    fn in_range_buffer_is_unchanged() {
        let original = vec![0.1, -1.0, 1.0, 0.0, -0.5];
        let mut samples = original.clone();
        assert!(!peak_normalize(&mut samples));
        assert_eq!(samples, original);
    }

    #[test]
    fn silence_is_unchanged() {
        let mut samples = vec![0.0; 4];
        assert!(!peak_normalize(&mut samples));
        assert_eq!(samples, vec![0.0; 4]);
    }

    #[test]
    fn empty_buffer_has_zero_peak() {
        assert_eq!(peak(&[]), 0.0);
        assert!(!peak_normalize(&mut []));
    }
}
