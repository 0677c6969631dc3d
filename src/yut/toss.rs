use rand::Rng;

use crate::yut::game::Outcome;

pub const GRAVITY: f64 = 0.8;
pub const BOUNCE_DAMPING: f64 = 0.4;
/// A stick stops bouncing once its rebound speed drops below this.
pub const SETTLE_SPEED: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stick {
    /// Height above the ground; negative is up.
    pub y: f64,
    pub vy: f64,
    pub angle: f64,
    pub spin: f64,
    pub face_up: bool,
    pub airborne: bool,
    landing_face: bool,
}

impl Stick {
    fn resting(face_up: bool) -> Self {
        Self {
            y: 0.0,
            vy: 0.0,
            angle: 0.0,
            spin: 0.0,
            face_up,
            airborne: false,
            landing_face: face_up,
        }
    }

    fn step(&mut self) {
        if !self.airborne {
            return;
        }
        self.vy += GRAVITY;
        self.y += self.vy;
        self.angle += self.spin;
        if self.y >= 0.0 {
            self.y = 0.0;
            self.vy *= -BOUNCE_DAMPING;
            if self.vy.abs() < SETTLE_SPEED {
                self.airborne = false;
                self.vy = 0.0;
                self.spin = 0.0;
                self.angle = 0.0;
                self.face_up = self.landing_face;
            }
        }
    }
}

/// Four sticks in flight. Physics only decides when they land; the faces
/// they land on are fixed at launch.
#[derive(Clone, Debug, PartialEq)]
pub struct StickToss {
    sticks: [Stick; 4],
    outcome: Outcome,
    frames: u32,
}

impl StickToss {
    pub fn launch<R: Rng>(outcome: Outcome, rng: &mut R) -> Self {
        let bits = outcome.bits();
        let mut sticks = [Stick::resting(true); 4];
        for (stick, face) in sticks.iter_mut().zip(bits) {
            stick.airborne = true;
            stick.vy = -(15.0 + rng.r#gen::<f64>() * 5.0);
            stick.spin = (rng.r#gen::<f64>() - 0.4) * 0.5;
            stick.landing_face = face;
        }
        Self {
            sticks,
            outcome,
            frames: 0,
        }
    }

    pub fn step(&mut self) {
        if self.is_settled() {
            return;
        }
        self.frames += 1;
        for stick in &mut self.sticks {
            stick.step();
        }
    }

    pub fn is_settled(&self) -> bool {
        self.sticks.iter().all(|s| !s.airborne)
    }

    pub fn sticks(&self) -> &[Stick; 4] {
        &self.sticks
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn settle(toss: &mut StickToss) -> u32 {
        for _ in 0..1000 {
            if toss.is_settled() {
                break;
            }
            toss.step();
        }
        toss.frames()
    }

    #[test]
    fn test_toss_settles_on_fixed_faces() {
        let mut rng = SmallRng::seed_from_u64(7);
        let outcome = Outcome::new([false, true, false, true]);
        let mut toss = StickToss::launch(outcome, &mut rng);
        assert!(!toss.is_settled());

        let frames = settle(&mut toss);
        assert!(toss.is_settled());
        assert!(frames > 10 && frames < 200, "took {frames} frames");
        let faces: Vec<bool> = toss.sticks().iter().map(|s| s.face_up).collect();
        assert_eq!(faces, vec![false, true, false, true]);
    }

    #[test]
    fn test_sticks_leave_the_ground() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut toss = StickToss::launch(Outcome::new([true; 4]), &mut rng);
        toss.step();
        assert!(toss.sticks().iter().all(|s| s.y < 0.0));
    }

    #[test]
    fn test_launch_velocity_range() {
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..50 {
            let toss = StickToss::launch(Outcome::new([false; 4]), &mut rng);
            for stick in toss.sticks() {
                assert!((-20.0..=-15.0).contains(&stick.vy));
                assert!((-0.2..=0.3).contains(&stick.spin));
            }
        }
    }

    #[test]
    fn test_settled_toss_ignores_steps() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut toss = StickToss::launch(Outcome::new([true, false, false, true]), &mut rng);
        let frames = settle(&mut toss);
        toss.step();
        assert_eq!(toss.frames(), frames);
    }
}
