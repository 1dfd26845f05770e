use std::ops::RangeInclusive;

use super::FloatNum;

pub(crate) fn limit_at_range(value: FloatNum, range: RangeInclusive<FloatNum>) -> FloatNum {
    if &value < range.start() {
        *range.start()
    } else if &value > range.end() {
        *range.end()
    } else {
        value
    }
}

/// -1 for negative values, 1 otherwise (zero counts as positive)
pub(crate) fn sign(value: FloatNum) -> FloatNum {
    if value < 0. {
        -1.
    } else {
        1.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_at_range() {
        assert_eq!(limit_at_range(3., -1.0..=1.), 1.);
        assert_eq!(limit_at_range(-3., -1.0..=1.), -1.);
        assert_eq!(limit_at_range(0.5, -1.0..=1.), 0.5);
    }

    #[test]
    fn test_sign_of_zero_is_positive() {
        assert_eq!(sign(0.), 1.);
        assert_eq!(sign(-0.1), -1.);
    }
}
