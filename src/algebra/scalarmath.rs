use super::{FloatT, ScalarMath};

impl<T: FloatT> ScalarMath for T {
    type T = T;
    fn clip(&self, min_thresh: T, max_thresh: T, min_new: T, max_new: T) -> T {
        if *self < min_thresh {
            min_new
        } else if *self > max_thresh {
            max_new
        } else {
            *self
        }
    }
}

#[test]
fn test_clip() {
    assert_eq!(0.5_f64.clip(1., 10., 1., 10.), 1.);
    assert_eq!(20_f64.clip(1., 10., 1., 10.), 10.);
    assert_eq!(5_f64.clip(1., 10., 1., 10.), 5.);
    // threshold and replacement values may differ
    assert_eq!(1e-6_f64.clip(1e-4, 1e4, 1., 1e4), 1.);
}
