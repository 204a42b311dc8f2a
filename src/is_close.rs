use ndarray::{ArrayBase, Data, Dimension, Zip};

/// Absolute tolerance on abundances expressed in dex.
pub const DEX_TOLERANCE: f64 = 1e-9;

pub trait IsClose<Rhs = Self> {
    fn is_close_within(&self, other: Rhs, tol: f64) -> bool;

    #[inline]
    fn is_close(&self, other: Rhs) -> bool {
        self.is_close_within(other, DEX_TOLERANCE)
    }
}

impl IsClose for f64 {
    #[inline]
    fn is_close_within(&self, other: f64, tol: f64) -> bool {
        (self - other).abs() <= tol
    }
}

/// Element-wise comparison, false on shape mismatch.
impl<S1, S2, D> IsClose<&ArrayBase<S2, D>> for ArrayBase<S1, D>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    fn is_close_within(&self, other: &ArrayBase<S2, D>, tol: f64) -> bool {
        self.shape() == other.shape()
            && Zip::from(self)
                .and(other)
                .all(|&a, &b| a.is_close_within(b, tol))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::arr1;

    use super::IsClose;

    #[test]
    fn scalar_tolerance() {
        assert!(1.0_f64.is_close(1.0 + 1e-12));
        assert!(!1.0_f64.is_close(1.0 + 1e-6));
        assert!(1.0_f64.is_close_within(1.0 + 1e-6, 1e-5));
        assert!(!f64::NAN.is_close(f64::NAN));
    }

    #[test]
    fn arrays_compare_elementwise() {
        let a = arr1(&[0.5, -1.25, 3.0]);
        let b = arr1(&[0.5, -1.25, 3.0 + 1e-11]);
        assert!(a.is_close(&b));
        assert!(!a.is_close(&arr1(&[0.5, -1.25])));
        assert!(!a.is_close(&arr1(&[0.5, -1.0, 3.0])));
    }
}
