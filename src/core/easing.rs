/// Monotonic mappings `[0,1] → [0,1]` applied to the elapsed-time fraction.
#[derive(Debug, Clone, Copy, Default)]
pub enum Easing {
    Linear,
    /// `1 - (1-t)^3`
    #[default]
    CubicOut,
    QuadOut,
    CubicInOut,
    Custom(fn(f64) -> f64),
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let eased = match self {
            Easing::Linear => t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuadOut => 1.0 - (1.0 - t).powi(2),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Custom(f) => f(t),
        };
        // 自訂函式也一律夾回 [0,1]
        if eased.is_nan() {
            0.0
        } else {
            eased.clamp(0.0, 1.0)
        }
    }
}
