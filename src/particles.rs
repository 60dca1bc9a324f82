use rand::Rng;

/// Wrap a coordinate into [0, 1).
///
/// `rem_euclid` can round up to exactly 1.0 for tiny negative inputs, which is
/// folded back to 0.0.
#[inline]
pub fn wrap_unit(x: f64) -> f64 {
    let w = x.rem_euclid(1.0);
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

/// Per-particle simulation state, stored as parallel arrays (structure of arrays)
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleState {
    pub pos_x: Vec<f64>,
    pub pos_y: Vec<f64>,
    pub vel_x: Vec<f64>,
    pub vel_y: Vec<f64>,
    /// Color index in [0, K)
    pub colors: Vec<usize>,
}

/// Read-only view of one particle handed to renderers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    /// Always in [0, 1)
    pub x: f64,
    /// Always in [0, 1)
    pub y: f64,
    pub color: usize,
}

impl ParticleState {
    /// Random positions in [0, 1), zero velocity, uniformly random colors
    pub fn random<R: Rng + ?Sized>(count: usize, color_count: usize, rng: &mut R) -> Self {
        let mut state = Self::with_capacity(count);
        for _ in 0..count {
            state.push(rng.gen::<f64>(), rng.gen::<f64>(), 0.0, 0.0, rng.gen_range(0..color_count));
        }
        state
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(capacity),
            pos_y: Vec::with_capacity(capacity),
            vel_x: Vec::with_capacity(capacity),
            vel_y: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Append one particle; used to build explicit layouts
    pub fn push(&mut self, x: f64, y: f64, vx: f64, vy: f64, color: usize) {
        self.pos_x.push(x);
        self.pos_y.push(y);
        self.vel_x.push(vx);
        self.vel_y.push(vy);
        self.colors.push(color);
    }

    /// Re-randomize positions and colors in place, zeroing velocity
    pub fn randomize<R: Rng + ?Sized>(&mut self, color_count: usize, rng: &mut R) {
        for i in 0..self.len() {
            self.pos_x[i] = rng.gen::<f64>();
            self.pos_y[i] = rng.gen::<f64>();
            self.vel_x[i] = 0.0;
            self.vel_y[i] = 0.0;
            self.colors[i] = rng.gen_range(0..color_count);
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// True when every parallel array has the same length
    pub fn is_consistent(&self) -> bool {
        let n = self.colors.len();
        self.pos_x.len() == n
            && self.pos_y.len() == n
            && self.vel_x.len() == n
            && self.vel_y.len() == n
    }

    /// Positions and colors for rendering, folded into [0, 1) on both axes
    pub fn snapshot(&self) -> Vec<ParticleView> {
        (0..self.len())
            .map(|i| ParticleView {
                x: wrap_unit(self.pos_x[i]),
                y: wrap_unit(self.pos_y[i]),
                color: self.colors[i],
            })
            .collect()
    }

    /// Mean speed over all particles (0 for an empty state)
    pub fn mean_speed(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .vel_x
            .iter()
            .zip(&self.vel_y)
            .map(|(vx, vy)| vx.hypot(*vy))
            .sum();
        total / self.len() as f64
    }

    /// Number of particles of each color
    pub fn color_counts(&self, color_count: usize) -> Vec<usize> {
        let mut counts = vec![0; color_count];
        for &c in &self.colors {
            if c < color_count {
                counts[c] += 1;
            }
        }
        counts
    }
}
