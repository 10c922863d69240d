//! Tests for byte frequency accumulation and normalization

#[cfg(test)]
mod tests {
    use bytecanvas::analysis::histogram::Histogram;

    // Tests counting, totals and rebuilds
    // Verified by accumulating across rebuilds
    #[test]
    fn test_absorb_and_rebuild() {
        let mut histogram = Histogram::from_bytes(&[3, 3, 9]);
        assert_eq!(histogram.count(3), 2);
        assert_eq!(histogram.count(9), 1);
        assert_eq!(histogram.total(), 3);

        histogram.absorb(3);
        assert_eq!(histogram.count(3), 3);

        histogram.rebuild(&[1]);
        assert_eq!(histogram.count(3), 0);
        assert_eq!(histogram.total(), 1);

        histogram.reset();
        assert_eq!(histogram, Histogram::default());
    }

    // Tests normalization preserves bucket order and scales to 255
    // Verified by dividing by the maximum bucket instead of the total
    #[test]
    fn test_normalize_preserves_order() {
        let mut bytes = vec![1u8; 3];
        bytes.extend([2u8; 5]);
        bytes.extend([3u8; 9]);
        let mut histogram = Histogram::from_bytes(&bytes);

        histogram.normalize();

        assert!(histogram.count(1) < histogram.count(2));
        assert!(histogram.count(2) < histogram.count(3));
        assert_eq!(histogram.count(3), 135);
        assert_eq!(histogram.count(0), 0);
    }

    // Tests a single symbol normalizes to full intensity
    // Verified by truncating the scaled value
    #[test]
    fn test_normalize_single_symbol() {
        let mut histogram = Histogram::from_bytes(&[42; 100]);
        histogram.normalize();
        assert_eq!(histogram.count(42), 255);
    }

    // Tests normalizing twice changes each bucket by at most one
    // Verified by skipping the rounding step
    #[test]
    fn test_normalize_nearly_idempotent() {
        let bytes: Vec<u8> = (0..1000u32).map(|i| (i * i % 251) as u8).collect();
        let mut once = Histogram::from_bytes(&bytes);
        once.normalize();
        let mut twice = once.clone();
        twice.normalize();

        for byte in 0..=255u8 {
            assert!(once.count(byte).abs_diff(twice.count(byte)) <= 1);
        }
    }

    // Tests an empty histogram is left untouched by normalization
    // Verified by dividing by a zero total
    #[test]
    fn test_normalize_empty() {
        let mut histogram = Histogram::new();
        histogram.normalize();
        assert_eq!(histogram.total(), 0);
        assert_eq!(histogram.intensity_lut(), [0; 256]);
    }

    // Tests the intensity lookup leaves the counts intact
    // Verified by normalizing in place
    #[test]
    fn test_intensity_lut_is_a_copy() {
        let histogram = Histogram::from_bytes(&[1, 1, 1, 2]);

        let lut = histogram.intensity_lut();

        assert_eq!(lut.get(1), Some(&191));
        assert_eq!(lut.get(2), Some(&64));
        assert_eq!(histogram.count(1), 3);
        assert_eq!(histogram.counts().iter().sum::<u32>(), 4);
    }
}
