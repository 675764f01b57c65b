use crate::{
    constants::game::{BIRD_RADIUS, BIRD_START_Y, BIRD_X, GRAVITY, GROUND_LINE, JUMP_IMPULSE},
    game::{
        phase::GamePhase,
        surface::{Paint, Surface},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    x: f32,
    y: f32,
    velocity: f32,
    radius: f32,
    gravity: f32,
    jump: f32,
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

impl Bird {
    pub fn new() -> Self {
        Bird { x: BIRD_X, y: BIRD_START_Y, velocity: 0.0, radius: BIRD_RADIUS, gravity: GRAVITY, jump: JUMP_IMPULSE }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn flap(&mut self) {
        self.velocity = -self.jump;
    }

    /// Advances one frame. Hitting the ground ends a running round, the ceiling only stops the
    /// bird.
    pub fn update(&mut self, phase: &mut GamePhase) {
        self.velocity += self.gravity;
        self.y += self.velocity;

        if self.y + self.radius >= GROUND_LINE {
            self.y = GROUND_LINE - self.radius;
            if phase.end_round() {
                tracing::debug!("bird hit the ground");
            }
        }
        if self.y - self.radius <= 0.0 {
            self.y = self.radius;
        }
    }

    pub fn reset(&mut self) {
        self.velocity = 0.0;
        self.y = BIRD_START_Y;
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.fill_circle(self.x, self.y, self.radius, Paint::Bird);
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, y: f32, velocity: f32) {
        self.y = y;
        self.velocity = velocity;
    }
}
