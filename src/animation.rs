use cgmath::{Deg, Matrix4, Vector3};

pub const MAX_OFFSET: f32 = 0.7;
pub const OFFSET_STEP: f32 = 0.005;

pub const ANGLE_STEP: f32 = 0.1;
pub const FULL_TURN: f32 = 360.0;

pub const INITIAL_SIZE: f32 = 0.4;
pub const MAX_SIZE: f32 = 0.8;
pub const MIN_SIZE: f32 = MAX_SIZE / 4.0;
pub const SIZE_STEP: f32 = 0.01;

/// Scalar bouncing between two bounds.
///
/// The bounds are checked after each step, so the value can end up one
/// `step` past a bound before it turns around. Both bounds are tested on
/// every step regardless of direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Oscillator {
    pub value: f32,
    pub rising: bool,
    pub step: f32,
    pub lower: f32,
    pub upper: f32,
}

impl Oscillator {
    pub fn advance(&mut self) {
        if self.rising {
            self.value += self.step;
        } else {
            self.value -= self.step;
        }

        if self.value >= self.upper || self.value <= self.lower {
            self.rising = !self.rising;
        }
    }
}

/// Rotation in degrees, wrapping back to zero once it goes past a full turn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Angle {
    pub degrees: f32,
    pub step: f32,
}

impl Angle {
    pub fn advance(&mut self) {
        self.degrees += self.step;

        // strictly greater, 360.0 itself is kept for one step
        if self.degrees > FULL_TURN {
            self.degrees = 0.0;
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Animation {
    pub offset: Oscillator,
    pub angle: Angle,
    pub size: Oscillator,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation {
    pub fn new() -> Self {
        Self {
            offset: Oscillator {
                value: 0.0,
                rising: false,
                step: OFFSET_STEP,
                lower: -MAX_OFFSET,
                upper: MAX_OFFSET,
            },
            angle: Angle {
                degrees: 0.0,
                step: ANGLE_STEP,
            },
            size: Oscillator {
                value: INITIAL_SIZE,
                rising: false,
                step: SIZE_STEP,
                lower: MIN_SIZE,
                upper: MAX_SIZE,
            },
        }
    }

    /// Advances by one frame. Speed is tied to the frame rate.
    pub fn step(&mut self) {
        self.offset.advance();
        self.angle.advance();
        self.size.advance();
    }

    /// `I * Rz(angle) * T(offset, 0, 0) * S(size, size, 0)`, so vertices get
    /// scaled first, then moved along x, then rotated around the origin.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let size = self.size.value;

        Matrix4::from_angle_z(Deg(self.angle.degrees))
            * Matrix4::from_translation(Vector3::new(self.offset.value, 0.0, 0.0))
            * Matrix4::from_nonuniform_scale(size, size, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};

    fn assert_close(a: Vector4<f32>, b: Vector4<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn first_frame() {
        let mut anim = Animation::new();
        anim.step();

        assert_eq!(anim.offset.value, -OFFSET_STEP);
        assert!(!anim.offset.rising);
        assert_eq!(anim.angle.degrees, ANGLE_STEP);
        assert_eq!(anim.size.value, INITIAL_SIZE - SIZE_STEP);
        assert!((anim.size.value - 0.39).abs() < 1e-6);
        assert!(!anim.size.rising);
    }

    #[test]
    fn offset_turns_at_bound() {
        let mut anim = Animation::new();

        for _ in 0..140 {
            anim.step();
        }
        assert!(!anim.offset.rising);
        assert!(anim.offset.value > -MAX_OFFSET);

        anim.step();
        assert!(anim.offset.rising);
        assert!((anim.offset.value + MAX_OFFSET + OFFSET_STEP).abs() < 1e-5);

        anim.step();
        assert!(anim.offset.rising);
        assert!(anim.offset.value > -MAX_OFFSET);
    }

    #[test]
    fn size_turns_at_lower_bound() {
        let mut anim = Animation::new();

        for _ in 0..20 {
            anim.step();
        }
        assert!(!anim.size.rising);

        anim.step();
        assert!(anim.size.rising);
        assert!((anim.size.value - (MIN_SIZE - SIZE_STEP)).abs() < 1e-5);

        anim.step();
        assert!(anim.size.rising);
    }

    #[test]
    fn oscillator_can_flip_on_consecutive_steps() {
        let mut osc = Oscillator {
            value: 0.25,
            rising: false,
            step: 0.25,
            lower: 0.25,
            upper: 1.0,
        };

        osc.advance();
        assert_eq!((osc.value, osc.rising), (0.0, true));
        osc.advance();
        assert_eq!((osc.value, osc.rising), (0.25, false));
        osc.advance();
        assert_eq!((osc.value, osc.rising), (0.0, true));
    }

    #[test]
    fn angle_wraps_strictly_past_full_turn() {
        let mut angle = Angle {
            degrees: 359.75,
            step: 0.25,
        };

        angle.advance();
        assert_eq!(angle.degrees, 360.0);
        angle.advance();
        assert_eq!(angle.degrees, 0.0);

        let mut angle = Angle {
            degrees: 359.95,
            step: ANGLE_STEP,
        };
        angle.advance();
        assert_eq!(angle.degrees, 0.0);
    }

    #[test]
    fn values_stay_in_range() {
        let mut anim = Animation::new();
        let eps = 1e-5;

        for _ in 0..100_000 {
            anim.step();

            assert!(anim.offset.value.abs() <= MAX_OFFSET + OFFSET_STEP + eps);
            assert!(anim.angle.degrees >= 0.0 && anim.angle.degrees < FULL_TURN);
            assert!(anim.size.value >= MIN_SIZE - SIZE_STEP - eps);
            assert!(anim.size.value <= MAX_SIZE + SIZE_STEP + eps);
        }
    }

    #[test]
    fn trajectory_is_reproducible() {
        let mut a = Animation::new();
        let mut b = Animation::new();

        for _ in 0..10_000 {
            a.step();
            b.step();
        }

        assert_eq!(a.offset.value.to_bits(), b.offset.value.to_bits());
        assert_eq!(a.angle.degrees.to_bits(), b.angle.degrees.to_bits());
        assert_eq!(a.size.value.to_bits(), b.size.value.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn identity_pose_only_scales() {
        let m = Animation::new().model_matrix();

        assert_close(m * Vector4::new(1.0, -1.0, 0.0, 1.0), Vector4::new(0.4, -0.4, 0.0, 1.0));
    }

    #[test]
    fn scale_then_translate_then_rotate() {
        let mut anim = Animation::new();
        anim.angle.degrees = 90.0;
        anim.offset.value = 0.5;
        anim.size.value = 0.5;

        let m = anim.model_matrix();

        // (1, 0) -> scaled (0.5, 0) -> moved (1, 0) -> rotated (0, 1)
        assert_close(m * Vector4::new(1.0, 0.0, 0.0, 1.0), Vector4::new(0.0, 1.0, 0.0, 1.0));
        assert_close(m * Vector4::new(0.0, 1.0, 0.0, 1.0), Vector4::new(-0.5, 0.5, 0.0, 1.0));
    }

    #[test]
    fn translation_lives_in_last_column() {
        let mut anim = Animation::new();
        anim.offset.value = 0.3;
        anim.size.value = 1.0;

        let m = anim.model_matrix();

        assert_close(m.w, Vector4::new(0.3, 0.0, 0.0, 1.0));
        assert_close(m.z, Vector4::new(0.0, 0.0, 0.0, 0.0));
    }
}
