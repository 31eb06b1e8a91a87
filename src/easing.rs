//! Easing curves applied to a tween's progress.

/// Maps linear progress in `[0, 1]` onto a curve with the same endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    /// Starts slow and accelerates; what things falling under gravity use.
    QuadIn,
    QuadOut,
    QuadInOut,
    Smoothstep,
}

impl Easing {
    /// Applies the curve. Input outside `[0, 1]` is clamped first.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::Smoothstep,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in ALL {
            let samples: Vec<f32> = (0..=20).map(|i| easing.apply(i as f32 / 20.0)).collect();
            assert!(samples.windows(2).all(|w| w[0] <= w[1]), "{easing:?}");
        }
    }

    #[test]
    fn clamps_input() {
        assert_eq!(Easing::QuadIn.apply(-1.0), 0.0);
        assert_eq!(Easing::QuadOut.apply(3.0), 1.0);
    }

    #[test]
    fn quadratic_shapes() {
        assert_eq!(Easing::QuadIn.apply(0.5), 0.25);
        assert_eq!(Easing::QuadOut.apply(0.5), 0.75);
        assert_eq!(Easing::QuadInOut.apply(0.5), 0.5);
        assert_eq!(Easing::Smoothstep.apply(0.5), 0.5);
    }
}
