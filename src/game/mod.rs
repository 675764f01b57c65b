//! The simulation: one context object owning the phase, the bird, the obstacles and the score.
//!
//! The frontend drives it with [`Game::update`] once per frame, forwards every user "activate"
//! through [`Game::activate`] between frames, and paints it with [`Game::draw`].

pub mod bird;
pub mod phase;
pub mod pipes;
pub mod score;
pub mod storage;
pub mod surface;

use tracing::info;

use self::{
    bird::Bird,
    phase::GamePhase,
    pipes::PipeField,
    score::Score,
    storage::BestScoreStore,
    surface::{Paint, Surface},
};
use crate::constants::game::{
    FIELD_WIDTH, GAME_OVER_TEXT_POS, GROUND_HEIGHT, GROUND_LINE, READY_TEXT_POS, RESTART_TEXT_POS,
};

#[derive(Debug)]
pub struct Game<S> {
    phase: GamePhase,
    bird: Bird,
    pipes: PipeField,
    score: Score<S>,
}

impl<S: BestScoreStore> Game<S> {
    pub fn new(store: S) -> Self {
        Self::with_pipes(store, PipeField::new())
    }

    pub fn seeded(store: S, seed: u64) -> Self {
        Self::with_pipes(store, PipeField::seeded(seed))
    }

    fn with_pipes(store: S, pipes: PipeField) -> Self {
        Game { phase: GamePhase::default(), bird: Bird::new(), pipes, score: Score::new(store) }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &PipeField {
        &self.pipes
    }

    pub fn score(&self) -> &Score<S> {
        &self.score
    }

    /// One frame of simulation.
    pub fn update(&mut self) {
        let was_playing = self.phase.is_playing();

        self.bird.update(&mut self.phase);
        self.pipes.update(&self.bird, &mut self.phase, &mut self.score);

        if was_playing && self.phase == GamePhase::Over {
            info!("round over with score {} (best {})", self.score.current(), self.score.best());
        }
    }

    /// The single user action: start, flap, or restart depending on the phase.
    pub fn activate(&mut self) {
        match self.phase {
            GamePhase::Ready => {
                info!("round started");
                self.phase = GamePhase::Playing;
            },
            GamePhase::Playing => self.bird.flap(),
            GamePhase::Over => {
                self.pipes.reset();
                self.bird.reset();
                self.score.reset();
                self.phase = GamePhase::Ready;
            },
        }
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.clear();

        self.bird.draw(surface);
        self.pipes.draw(surface);
        surface.fill_rect(0.0, GROUND_LINE, FIELD_WIDTH, GROUND_HEIGHT, Paint::Ground);
        self.score.draw(self.phase, surface);

        match self.phase {
            GamePhase::Ready => {
                let (x, y) = READY_TEXT_POS;
                surface.fill_text(x, y, "Click to Start", Paint::Text);
            },
            GamePhase::Playing => {},
            GamePhase::Over => {
                let (x, y) = GAME_OVER_TEXT_POS;
                surface.fill_text(x, y, "Game Over", Paint::Alert);
                let (x, y) = RESTART_TEXT_POS;
                surface.fill_text(x, y, "Click to Restart", Paint::Alert);
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn parts_mut(&mut self) -> (&mut Bird, &mut PipeField) {
        (&mut self.bird, &mut self.pipes)
    }
}
