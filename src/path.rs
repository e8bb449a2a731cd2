/// Cubic bezier used for connections and the rubber-band preview
///
/// Control points extend horizontally from both ends by half the horizontal distance,
/// which gives the familiar S-shaped wire between an output on the right of one node
/// and an input on the left of another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: (f32, f32), // Start point
    pub p1: (f32, f32), // Control point 1
    pub p2: (f32, f32), // Control point 2
    pub p3: (f32, f32), // End point
}

impl CubicBezier {
    /// Create the connection curve between two world-space points
    ///
    /// # Arguments
    /// * `start` - Output port centre (or any start point)
    /// * `end` - Input port centre, or the cursor for a rubber band
    pub fn from_endpoints(start: (f32, f32), end: (f32, f32)) -> Self {
        let offset = (end.0 - start.0).abs() / 2.0;

        CubicBezier {
            p0: start,
            p1: (start.0 + offset, start.1),
            p2: (end.0 - offset, end.1),
            p3: end,
        }
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> (f32, f32) {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.0
            + 3.0 * mt2 * t * self.p1.0
            + 3.0 * mt * t2 * self.p2.0
            + t3 * self.p3.0;
        let y = mt3 * self.p0.1
            + 3.0 * mt2 * t * self.p1.1
            + 3.0 * mt * t2 * self.p2.1
            + t3 * self.p3.1;

        (x, y)
    }

    /// Sample the curve at `segments + 1` uniform parameter values, both ends included
    pub fn samples(&self, segments: usize) -> impl Iterator<Item = (f32, f32)> + '_ {
        let segments = segments.max(1);
        (0..=segments).map(move |i| {
            // Exact endpoints, independent of float rounding in the blend
            if i == 0 {
                self.p0
            } else if i == segments {
                self.p3
            } else {
                self.eval(i as f32 / segments as f32)
            }
        })
    }

    /// Whether `point` lies within `threshold` of any of the sampled curve points
    ///
    /// This is deliberately a sampled test, not an exact distance: the clickable region
    /// is a chain of discs around the samples, so changing `segments` changes which
    /// clicks land.
    pub fn hit(&self, point: (f32, f32), segments: usize, threshold: f32) -> bool {
        let threshold_sq = threshold * threshold;
        self.samples(segments).any(|sample| {
            let dx = point.0 - sample.0;
            let dy = point.1 - sample.1;
            dx * dx + dy * dy <= threshold_sq
        })
    }

    /// Smallest distance from `point` to one of the sampled curve points
    pub fn sampled_distance(&self, point: (f32, f32), segments: usize) -> f32 {
        self.samples(segments)
            .map(|sample| {
                let dx = point.0 - sample.0;
                let dy = point.1 - sample.1;
                dx * dx + dy * dy
            })
            .fold(f32::MAX, f32::min)
            .sqrt()
    }

    /// Map every point through `f`, e.g. a world→screen transform
    pub fn map(&self, f: impl Fn((f32, f32)) -> (f32, f32)) -> Self {
        CubicBezier {
            p0: f(self.p0),
            p1: f(self.p1),
            p2: f(self.p2),
            p3: f(self.p3),
        }
    }

    /// SVG path command for this curve (e.g., "M 10 20 C 55 20 55 80 100 80")
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.p0.0, self.p0.1, self.p1.0, self.p1.1, self.p2.0, self.p2.1, self.p3.0, self.p3.1
        )
    }
}

/// Generate the SVG path command of a connection curve between two points
pub fn generate_bezier_path(start: (f32, f32), end: (f32, f32)) -> String {
    CubicBezier::from_endpoints(start, end).to_svg_path()
}
