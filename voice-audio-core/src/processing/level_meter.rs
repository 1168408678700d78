//! RMS/peak level metering.
//!
//! Pure functions; the caller holds the running `current`/`peak` values and
//! feeds them back in on the next buffer.

/// Gain applied to raw RMS before clamping, tuned so normal speech fills the
/// 0.0–1.0 meter range.
pub const METER_GAIN: f32 = 3.0;

/// Exponential-moving-average factor for smoothing the displayed level.
pub const SMOOTHING_FACTOR: f32 = 0.3;

/// Per-call geometric decay applied to the running peak.
pub const PEAK_DECAY: f32 = 0.95;

/// Root-mean-square of `samples`, scaled by [`METER_GAIN`] and clamped to
/// `[0.0, 1.0]`. Empty input yields 0.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    let root = (sum_sq / samples.len() as f32).sqrt();
    (root * METER_GAIN).clamp(0.0, 1.0)
}

/// Exponential moving average: `previous * (1 - factor) + new_level * factor`.
pub fn smooth(new_level: f32, previous_level: f32, factor: f32) -> f32 {
    previous_level * (1.0 - factor) + new_level * factor
}

/// Peak tracking: rises instantly to any higher incoming level, otherwise
/// decays geometrically each call.
pub fn update_peak(current_level: f32, previous_peak: f32, decay: f32) -> f32 {
    current_level.max(previous_peak * decay)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rms_empty_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn rms_silence_is_zero() {
        assert_eq!(rms(&[0.0; 256]), 0.0);
    }

    #[test]
    fn rms_monotonic_in_amplitude() {
        let mut previous = 0.0;
        for amplitude in [0.01f32, 0.05, 0.1, 0.2, 0.3] {
            let buffer = vec![amplitude; 512];
            let level = rms(&buffer);
            assert!(level > previous, "rms({}) should exceed rms of lower amplitude", amplitude);
            previous = level;
        }
    }

    #[test]
    fn rms_applies_gain() {
        // Constant amplitude 0.1 has RMS 0.1, scaled by gain 3.0.
        let level = rms(&[0.1; 1024]);
        assert_relative_eq!(level, 0.3, max_relative = 1e-4);
    }

    #[test]
    fn rms_clamps_at_one() {
        assert_eq!(rms(&[1.0; 64]), 1.0);
        assert_eq!(rms(&[0.9; 64]), 1.0); // 0.9 * 3.0 > 1.0
    }

    #[test]
    fn smooth_is_weighted_average() {
        let result = smooth(1.0, 0.0, SMOOTHING_FACTOR);
        assert_relative_eq!(result, 0.3, max_relative = 1e-6);

        let result = smooth(0.0, 1.0, SMOOTHING_FACTOR);
        assert_relative_eq!(result, 0.7, max_relative = 1e-6);
    }

    #[test]
    fn smooth_converges_toward_new_level() {
        let mut level = 0.0;
        for _ in 0..50 {
            level = smooth(0.8, level, SMOOTHING_FACTOR);
        }
        assert_relative_eq!(level, 0.8, max_relative = 1e-3);
    }

    #[test]
    fn peak_rises_instantly() {
        assert_eq!(update_peak(0.9, 0.2, PEAK_DECAY), 0.9);
    }

    #[test]
    fn peak_decays_geometrically() {
        let peak = update_peak(0.0, 1.0, PEAK_DECAY);
        assert_relative_eq!(peak, 0.95, max_relative = 1e-6);

        let peak = update_peak(0.0, peak, PEAK_DECAY);
        assert_relative_eq!(peak, 0.9025, max_relative = 1e-6);
    }

    #[test]
    fn peak_never_below_decayed_previous() {
        let mut peak = 1.0;
        for _ in 0..100 {
            let next = update_peak(0.1, peak, PEAK_DECAY);
            assert!(next >= peak * PEAK_DECAY);
            assert!(next >= 0.1);
            peak = next;
        }
        // Floor is the steady incoming level.
        assert_relative_eq!(peak, 0.1, max_relative = 1e-3);
    }
}
