//! Random initial decompositions.

use linalg::{codec, normalize, C64};
use rng::SeedStream;
use tangle::Layout;

/// Random decomposition: weights uniform then normalized to sum 1, each state
/// with real and imaginary parts uniform in `[-1, 1]`, normalized to unit norm.
pub fn random_start(layout: Layout, rng: &mut SeedStream) -> Vec<f64> {
    let np = layout.np();
    let nc = layout.nc();
    let mut x = vec![0.0; layout.dim()];

    rng.fill_uniform(&mut x[..np], 0.0, 1.0, b"WEIGHT");
    let total: f64 = x[..np].iter().sum();
    if total > 0.0 {
        x[..np].iter_mut().for_each(|p| *p /= total);
    } else {
        x[..np].fill(1.0 / np as f64);
    }

    let mut re = vec![0.0; nc];
    let mut im = vec![0.0; nc];
    let mut c = vec![C64::new(0.0, 0.0); nc];
    for i in 0..np {
        rng.fill_uniform(&mut re, -1.0, 1.0, b"COEFF_RE");
        rng.fill_uniform(&mut im, -1.0, 1.0, b"COEFF_IM");
        for k in 0..nc {
            c[k] = C64::new(re[k], im[k]);
        }
        normalize(&mut c);
        codec::write_real(&c, &mut x[layout.state_range(i)]);
    }
    x
}

/// Starting point of start `index`; depends only on `seed` and `index`.
pub fn start_point(seed: &str, index: usize, layout: Layout) -> Vec<f64> {
    let mut rng = SeedStream::derive(seed.as_bytes(), "start", index as u64);
    random_start(layout, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::start_point;
    use tangle::Layout;

    #[test]
    fn start_is_a_valid_decomposition_shape() {
        let layout = Layout::three_qubits(4).unwrap();
        let x = start_point("seed", 0, layout);
        assert_eq!(x.len(), layout.dim());

        let total: f64 = x[..4].iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(x[..4].iter().all(|&p| (0.0..=1.0).contains(&p)));

        for i in 0..4 {
            let sq: f64 = x[layout.state_range(i)].iter().map(|v| v * v).sum();
            assert!((sq - 1.0).abs() < 1e-12);
        }
        assert!(x[4..].iter().all(|&v| (-1.0..=1.0).contains(&v)));
    }

    #[test]
    fn starts_are_reproducible_and_distinct() {
        let layout = Layout::three_qubits(4).unwrap();
        assert_eq!(start_point("seed", 3, layout), start_point("seed", 3, layout));
        assert_ne!(start_point("seed", 3, layout), start_point("seed", 4, layout));
        assert_ne!(start_point("seed", 3, layout), start_point("other", 3, layout));
    }
}
