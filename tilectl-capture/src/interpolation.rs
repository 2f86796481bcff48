use serde::{Deserialize, Serialize};

/// Interpolation curve types for smooth drag movement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Curve {
    /// Linear interpolation (constant velocity)
    #[default]
    Linear,
    /// Cubic ease-in-out (smooth acceleration and deceleration)
    EaseInOut,
}

impl std::str::FromStr for Curve {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Curve::Linear),
            "ease-in-out" | "ease" | "easeinout" => Ok(Curve::EaseInOut),
            _ => Err(format!("Unknown curve '{}'. Use: linear, ease-in-out", s)),
        }
    }
}

/// Progress along `curve` at `t` in `[0, 1]`.
fn interpolate(t: f64, curve: Curve) -> f64 {
    match curve {
        Curve::Linear => t,
        Curve::EaseInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        }
    }
}

/// Split a drag of `(dx, dy)` into small movement deltas.
///
/// Targets 125 Hz over `duration` seconds with at least 10 steps. The
/// deltas always sum to exactly `(dx, dy)`; a pan that drifts by a pixel
/// per tile would accumulate across the whole sweep.
pub fn generate_steps(dx: i32, dy: i32, duration: f64, curve: Curve) -> Vec<(i32, i32)> {
    let steps = (duration * 125.0).ceil().max(10.0) as usize;
    let mut movements = Vec::with_capacity(steps);

    let mut emitted_x = 0i64;
    let mut emitted_y = 0i64;

    for i in 0..steps {
        let t = (i + 1) as f64 / steps as f64;
        let progress = interpolate(t, curve);

        let target_x = (f64::from(dx) * progress).round() as i64;
        let target_y = (f64::from(dy) * progress).round() as i64;

        movements.push(((target_x - emitted_x) as i32, (target_y - emitted_y) as i32));
        emitted_x = target_x;
        emitted_y = target_y;
    }

    // Rounding can leave the last step a pixel short.
    if let Some(last) = movements.last_mut() {
        last.0 += (i64::from(dx) - emitted_x) as i32;
        last.1 += (i64::from(dy) - emitted_y) as i32;
    }

    movements
}
