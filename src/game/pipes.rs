use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace};

use crate::{
    constants::game::{
        FIELD_WIDTH, PIPE_BASE_OFFSET, PIPE_GAP, PIPE_HEIGHT, PIPE_SPAWN_INTERVAL, PIPE_SPEED, PIPE_WIDTH,
    },
    game::{
        bird::Bird,
        phase::GamePhase,
        score::Score,
        storage::BestScoreStore,
        surface::{Paint, Surface},
    },
};

/// A top and bottom pipe sharing one x. `y` is where the top segment starts (usually above
/// the screen); the gap begins at `y + PIPE_HEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
}

impl Obstacle {
    pub fn gap_top(&self) -> f32 {
        self.y + PIPE_HEIGHT
    }

    pub fn gap_bottom(&self) -> f32 {
        self.gap_top() + PIPE_GAP
    }

    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    pub fn hits(&self, bird: &Bird) -> bool {
        let overlaps_x = bird.x() + bird.radius() > self.x && bird.x() - bird.radius() < self.right();
        let outside_gap = bird.y() - bird.radius() < self.gap_top() || bird.y() + bird.radius() > self.gap_bottom();
        overlaps_x && outside_gap
    }
}

/// Obstacles in arrival order. Everything spawns at the right edge and scrolls at one speed,
/// so the front of the queue is always the leftmost obstacle.
#[derive(Debug)]
pub struct PipeField {
    obstacles: VecDeque<Obstacle>,
    // Active frames left until the next spawn; 0 spawns on the next active frame.
    countdown: u32,
    rng: StdRng,
}

impl Default for PipeField {
    fn default() -> Self {
        Self::new()
    }
}

impl PipeField {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        PipeField { obstacles: VecDeque::new(), countdown: 0, rng }
    }

    pub fn obstacles(&self) -> &VecDeque<Obstacle> {
        &self.obstacles
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn update<S: BestScoreStore>(&mut self, bird: &Bird, phase: &mut GamePhase, score: &mut Score<S>) {
        if !phase.is_playing() {
            return;
        }

        if self.countdown == 0 {
            self.spawn();
            self.countdown = PIPE_SPAWN_INTERVAL;
        }
        self.countdown -= 1;

        for obstacle in self.obstacles.iter_mut() {
            obstacle.x -= PIPE_SPEED;
            if obstacle.hits(bird) && phase.end_round() {
                debug!("bird hit obstacle at x={:.1}", obstacle.x);
            }
        }

        // Removal happens after the scan, never during it.
        while self.obstacles.front().is_some_and(|front| front.right() < 0.0) {
            self.obstacles.pop_front();
            score.record_pass();
        }
    }

    fn spawn(&mut self) {
        let y = PIPE_BASE_OFFSET * (self.rng.gen::<f32>() + 1.0);
        trace!("spawning obstacle with offset {y:.1}");
        self.obstacles.push_back(Obstacle { x: FIELD_WIDTH, y });
    }

    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.countdown = 0;
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        for obstacle in &self.obstacles {
            surface.fill_rect(obstacle.x, obstacle.y, PIPE_WIDTH, PIPE_HEIGHT, Paint::Pipe);
            surface.fill_rect(obstacle.x, obstacle.gap_bottom(), PIPE_WIDTH, PIPE_HEIGHT, Paint::Pipe);
        }
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, x: f32, y: f32) {
        self.obstacles.push_back(Obstacle { x, y });
    }

    #[cfg(test)]
    pub(crate) fn hold_spawns(&mut self, frames: u32) {
        self.countdown = frames;
    }
}
