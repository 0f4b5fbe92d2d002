use rand::Rng;
use rand_distr::StandardNormal;

/// Draws one parameter from N(0, 1), redrawing on an exact zero so no
/// weight or bias starts out dead.
pub fn nonzero_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let v: f64 = rng.sample(StandardNormal);
        if v != 0.0 {
            return v;
        }
    }
}

/// A vector of `len` independent draws from [`nonzero_normal`].
pub fn random_vec<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<f64> {
    (0..len).map(|_| nonzero_normal(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn draws_are_nonzero_and_small() {
        let mut rng = StdRng::seed_from_u64(7);
        let v = random_vec(1000, &mut rng);
        assert_eq!(v.len(), 1000);
        assert!(v.iter().all(|x| *x != 0.0 && x.abs() < 10.0));
    }

    #[test]
    fn same_seed_same_draws() {
        let a = random_vec(16, &mut StdRng::seed_from_u64(42));
        let b = random_vec(16, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
