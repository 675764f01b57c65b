use tracing::{info, warn};

use crate::{
    constants::game::{BEST_SCORE_POS, FINAL_SCORE_POS, SCORE_POS},
    game::{
        phase::GamePhase,
        storage::BestScoreStore,
        surface::{Paint, Surface},
    },
};

/// Current round score plus the all-time best, which is written through to `S` whenever it
/// grows.
#[derive(Debug)]
pub struct Score<S> {
    current: u32,
    best: u32,
    store: S,
}

impl<S: BestScoreStore> Score<S> {
    pub fn new(store: S) -> Self {
        let best = store.load();
        info!("loaded best score {best}");
        Self { current: 0, best, store }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One obstacle made it off the left edge.
    pub fn record_pass(&mut self) {
        self.current += 1;
        if self.current > self.best {
            self.best = self.current;
            info!("new best score {}", self.best);
            if let Err(e) = self.store.save(self.best) {
                warn!("could not persist best score {}: {e:#}", self.best);
            }
        }
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn draw(&self, phase: GamePhase, surface: &mut impl Surface) {
        match phase {
            GamePhase::Ready => {},
            GamePhase::Playing => {
                let (x, y) = SCORE_POS;
                surface.fill_text(x, y, &self.current.to_string(), Paint::Text);
            },
            GamePhase::Over => {
                let (x, y) = FINAL_SCORE_POS;
                surface.fill_text(x, y, &format!("Score: {}", self.current), Paint::Text);
                let (x, y) = BEST_SCORE_POS;
                surface.fill_text(x, y, &format!("Best: {}", self.best), Paint::Text);
            },
        }
    }
}
