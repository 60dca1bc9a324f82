/// Piecewise particle-life force law.
///
/// Maps a normalized distance `r_norm = distance / max_radius` and an attraction
/// coefficient to a scalar force along the i→j direction:
///
/// ```text
/// r_norm < beta        r_norm / beta - 1                                (repulsion, -1..0)
/// beta <= r_norm < 1   a * (1 - |2 r_norm - 1 - beta| / (1 - beta))     (tent, peak a at (1+beta)/2)
/// r_norm >= 1          0
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLaw {
    beta: f64,
}

impl ForceLaw {
    pub fn new(beta: f64) -> Self {
        Self { beta }
    }

    /// Scalar force for a pair at normalized distance `r_norm`
    #[inline]
    pub fn force(&self, r_norm: f64, attraction: f64) -> f64 {
        let beta = self.beta;
        if r_norm < beta {
            r_norm / beta - 1.0
        } else if r_norm < 1.0 {
            attraction * (1.0 - (2.0 * r_norm - 1.0 - beta).abs() / (1.0 - beta))
        } else {
            0.0
        }
    }

    /// Normalized distance where the attraction window peaks
    pub fn peak(&self) -> f64 {
        (1.0 + self.beta) / 2.0
    }
}
