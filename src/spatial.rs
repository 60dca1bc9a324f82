/// Shortest signed displacement between two coordinates on the unit torus
#[inline]
pub fn periodic_delta(d: f64) -> f64 {
    if d > 0.5 {
        d - 1.0
    } else if d < -0.5 {
        d + 1.0
    } else {
        d
    }
}

/// Uniform grid over the periodic unit square, bucketing particle indices by cell.
///
/// Cells are at least `max_radius` wide, so every pair within the interaction
/// radius lies in the same or an adjacent cell (wrapping at the edges). Bucket
/// storage is reused between rebuilds.
///
/// The number of cells per axis is capped at `ceil(sqrt(particle_count))`, so a
/// tiny radius never allocates more buckets than there are particles to fill them.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Cells per axis
    dim: usize,
    cell_size: f64,
    buckets: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(max_radius: f64, particle_count: usize) -> Self {
        // floor(1 / r) cells of width 1/dim >= r; with ceil the last cell would be
        // narrower than r and a neighbor could sit two cells away across the wrap.
        // Fewer, wider cells only add candidates, so the cap keeps that guarantee.
        let by_radius = (1.0 / max_radius).floor() as usize;
        let by_count = (particle_count as f64).sqrt().ceil() as usize;
        let dim = by_radius.min(by_count).max(1);
        Self {
            dim,
            cell_size: 1.0 / dim as f64,
            buckets: vec![Vec::new(); dim * dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell index along one axis, normalized into [0, dim)
    #[inline]
    fn axis_cell(&self, p: f64) -> usize {
        let c = (p / self.cell_size).floor() as i64;
        c.rem_euclid(self.dim as i64) as usize
    }

    /// (column, row) of the cell containing a position
    pub fn cell_of(&self, x: f64, y: f64) -> (usize, usize) {
        (self.axis_cell(x), self.axis_cell(y))
    }

    /// Clear every bucket and re-insert all particles from their current positions
    pub fn rebuild(&mut self, pos_x: &[f64], pos_y: &[f64]) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        for (i, (&x, &y)) in pos_x.iter().zip(pos_y).enumerate() {
            let (cx, cy) = self.cell_of(x, y);
            self.buckets[cy * self.dim + cx].push(i);
        }
    }

    /// Particle indices in a single cell
    pub fn bucket(&self, cx: usize, cy: usize) -> &[usize] {
        &self.buckets[cy * self.dim + cx]
    }

    /// Distinct neighboring cells along one axis (fewer than 3 on tiny grids)
    fn axis_neighbors(&self, c: usize) -> ([usize; 3], usize) {
        let dim = self.dim;
        match dim {
            1 => ([0, 0, 0], 1),
            2 => ([0, 1, 0], 2),
            _ => ([(c + dim - 1) % dim, c, (c + 1) % dim], 3),
        }
    }

    /// Visit every particle index in the wrapped 3x3 block of cells around (x, y).
    ///
    /// Each cell is visited once, so no index is reported twice. The caller is
    /// responsible for skipping the particle itself.
    pub fn for_each_candidate<F: FnMut(usize)>(&self, x: f64, y: f64, mut f: F) {
        let (cx, cy) = self.cell_of(x, y);
        let (cols, ncols) = self.axis_neighbors(cx);
        let (rows, nrows) = self.axis_neighbors(cy);
        for &row in &rows[..nrows] {
            for &col in &cols[..ncols] {
                for &j in &self.buckets[row * self.dim + col] {
                    f(j);
                }
            }
        }
    }
}
