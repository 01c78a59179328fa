//! Per-frame scroll rules. Every factor is applied once per frame, so the
//! motion is tied to the display refresh rate rather than wall time.

/// Gap below which `current` is snapped onto `target` while idle.
pub const SNAP_EPSILON: f32 = 0.05;
/// Distance from a bound below which spring-back snaps onto the bound.
pub const BOUND_EPSILON: f32 = 0.1;

pub fn out_of_range(value: f32, max_scroll: f32) -> bool {
    value < 0.0 || value > max_scroll
}

/// Wheel input gets weaker once the target is already past an edge.
pub fn resist_wheel(delta: f32, target: f32, max_scroll: f32, elasticity: f32) -> f32 {
    if out_of_range(target, max_scroll) {
        delta * elasticity
    } else {
        delta
    }
}

/// Target for a drag that started at `start_x` with the track at
/// `start_scroll`. The amplified pixel delta is subtracted (dragging left moves
/// content right); any excess past an edge is scaled by `elasticity`.
pub fn drag_target(
    start_scroll: f32,
    start_x: f32,
    x: f32,
    drag_speed: f32,
    max_scroll: f32,
    elasticity: f32,
) -> f32 {
    let raw = start_scroll - (x - start_x) * drag_speed;
    if raw < 0.0 {
        raw * elasticity
    } else if raw > max_scroll {
        max_scroll + (raw - max_scroll) * elasticity
    } else {
        raw
    }
}

/// One frame of spring-back: pull an out-of-range target toward the violated
/// bound. In-range targets are returned untouched.
pub fn spring_back(target: f32, max_scroll: f32, spring_factor: f32) -> f32 {
    let bound = if target < 0.0 {
        0.0
    } else if target > max_scroll {
        max_scroll
    } else {
        return target;
    };
    let next = target + (bound - target) * spring_factor;
    if (next - bound).abs() < BOUND_EPSILON {
        bound
    } else {
        next
    }
}

/// One frame of momentum: exponential approach, never overshoots.
pub fn integrate(current: f32, target: f32, friction: f32) -> f32 {
    current + (target - current) * friction
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── resist_wheel ────────────────────────────────────────────────────

    #[test]
    fn wheel_in_range_is_unscaled() {
        assert_eq!(resist_wheel(40.0, 100.0, 500.0, 0.2), 40.0);
        assert_eq!(resist_wheel(40.0, 0.0, 500.0, 0.2), 40.0);
        assert_eq!(resist_wheel(40.0, 500.0, 500.0, 0.2), 40.0);
    }

    #[test]
    fn wheel_past_edge_is_scaled() {
        assert!((resist_wheel(40.0, -1.0, 500.0, 0.2) - 8.0).abs() < 1e-5);
        assert!((resist_wheel(40.0, 501.0, 500.0, 0.2) - 8.0).abs() < 1e-5);
    }

    // ── drag_target ─────────────────────────────────────────────────────

    #[test]
    fn drag_in_range_is_amplified_exactly() {
        // pointer travels 100px to the left
        let t = drag_target(300.0, 500.0, 400.0, 1.5, 1000.0, 0.2);
        assert_eq!(t, 450.0);
        let t = drag_target(300.0, 500.0, 600.0, 1.5, 1000.0, 0.2);
        assert_eq!(t, 150.0);
    }

    #[test]
    fn drag_past_start_is_sticky() {
        // raw = 0 - 100 * 1.5 = -150
        let t = drag_target(0.0, 0.0, 100.0, 1.5, 1000.0, 0.2);
        assert!((t + 30.0).abs() < 1e-4);
    }

    #[test]
    fn drag_past_end_is_sticky() {
        // raw = 1000 + 200 * 1.5 = 1300
        let t = drag_target(1000.0, 500.0, 300.0, 1.5, 1000.0, 0.2);
        assert!((t - 1060.0).abs() < 1e-3);
    }

    // ── spring_back ─────────────────────────────────────────────────────

    #[test]
    fn spring_back_leaves_in_range_alone() {
        assert_eq!(spring_back(250.0, 500.0, 0.2), 250.0);
    }

    #[test]
    fn spring_back_shrinks_overshoot_geometrically() {
        let mut t = 600.0;
        for n in 1..=10 {
            t = spring_back(t, 500.0, 0.2);
            let expected = 100.0 * 0.8f32.powi(n);
            assert!((t - 500.0 - expected).abs() < 1e-2, "frame {}: {}", n, t);
        }
    }

    #[test]
    fn spring_back_reaches_bound_in_bounded_frames() {
        let mut t = 600.0;
        let mut frames = 0;
        while t != 500.0 {
            t = spring_back(t, 500.0, 0.2);
            frames += 1;
            assert!(frames <= 40, "did not settle");
        }
        // 100 * 0.8^n < 0.1 first holds at n = 31
        assert_eq!(frames, 31);
    }

    #[test]
    fn spring_back_from_below_zero() {
        let mut t = -50.0;
        for _ in 0..40 {
            t = spring_back(t, 500.0, 0.2);
        }
        assert_eq!(t, 0.0);
    }

    // ── integrate ───────────────────────────────────────────────────────

    #[test]
    fn integrate_never_overshoots() {
        let mut c = 0.0;
        for _ in 0..500 {
            c = integrate(c, 100.0, 0.08);
            assert!(c <= 100.0);
        }
        assert!((100.0 - c).abs() < SNAP_EPSILON);
    }
}
