use sha3::{digest::{ExtendableOutput, Update, XofReader}, Shake256};

/// Deterministic pseudo-random stream built on SHAKE256.
///
/// Every draw carries a context label, so two call sites never share output
/// even when they consume the stream in a different order. Streams are owned
/// values: a multi-start search derives one per start with [`SeedStream::derive`]
/// instead of sharing a global generator.
#[derive(Clone)]
pub struct SeedStream {
    state: [u8; 32],
    step: u64,
}

impl SeedStream {
    pub fn new(seed: &[u8]) -> Self {
        let mut state = [0u8; 32];
        shake(&[seed, b"TANGLE_INIT"], &mut state);
        Self { state, step: 0 }
    }

    /// Independent child stream for the `index`-th item labelled `label`.
    ///
    /// The child depends only on the parent's seed, `label` and `index`, not
    /// on how many values the parent has already produced.
    pub fn derive(seed: &[u8], label: &str, index: u64) -> Self {
        let mut state = [0u8; 32];
        shake(
            &[seed, b"TANGLE_DERIVE", label.as_bytes(), &index.to_be_bytes()],
            &mut state,
        );
        Self { state, step: 0 }
    }

    /// Uniform sample in `[0, 1]`.
    pub fn next_f64(&mut self, ctx: &[u8]) -> f64 {
        self.step += 1;

        let state = self.state;
        let step_bytes = self.step.to_be_bytes();
        let mut next_state = self.state;
        shake(&[&state, &step_bytes, b"TANGLE_STEP"], &mut next_state);
        self.state = next_state;

        let mut out = [0u8; 8];
        shake(&[&self.state, ctx], &mut out);

        (u64::from_be_bytes(out) as f64) / (u64::MAX as f64)
    }

    /// Uniform sample in `[lo, hi]`.
    pub fn uniform(&mut self, lo: f64, hi: f64, ctx: &[u8]) -> f64 {
        lo + (hi - lo) * self.next_f64(ctx)
    }

    /// Fills `out` with uniform samples in `[lo, hi]`.
    pub fn fill_uniform(&mut self, out: &mut [f64], lo: f64, hi: f64, ctx: &[u8]) {
        for v in out.iter_mut() {
            *v = self.uniform(lo, hi, ctx);
        }
    }

    pub fn draws(&self) -> u64 {
        self.step
    }
}

fn shake(parts: &[&[u8]], out: &mut [u8]) {
    let mut h = Shake256::default();
    for p in parts {
        h.update(p);
    }
    let mut r = h.finalize_xof();
    r.read(out);
}
