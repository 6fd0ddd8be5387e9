use crate::layout::{Layout, THREE_QUBITS};
use crate::pure::{three_tangle, three_tangle_gradient};
use linalg::C64;
use optim::Objective;

/// Average pure-state tangle `sum_i p_i * tau(c_i)` of a decomposition.
#[derive(Clone, Copy, Debug)]
pub struct DecompositionObjective {
    layout: Layout,
}

impl DecompositionObjective {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }
}

impl Objective for DecompositionObjective {
    fn dim(&self) -> usize {
        self.layout.dim()
    }

    fn value(&self, x: &[f64]) -> f64 {
        let mut c = [C64::new(0.0, 0.0); THREE_QUBITS];
        let mut total = 0.0;
        for (i, &p) in self.layout.weights(x).iter().enumerate() {
            self.layout.read_state(x, i, &mut c);
            total += p * three_tangle(&c);
        }
        total
    }

    fn gradient(&self, x: &[f64], grad: &mut [f64]) {
        let layout = self.layout;
        let mut c = [C64::new(0.0, 0.0); THREE_QUBITS];
        let mut g = [0.0; 2 * THREE_QUBITS];
        for i in 0..layout.np() {
            let p = x[i];
            layout.read_state(x, i, &mut c);
            grad[i] = three_tangle_gradient(&c, &mut g);
            for (dst, &src) in grad[layout.state_range(i)].iter_mut().zip(g.iter()) {
                *dst = p * src;
            }
        }
    }
}
