// Playfield, in world units. Origin is the top-left corner, y grows downward.
pub const FIELD_WIDTH: f32 = 320.0;
pub const FIELD_HEIGHT: f32 = 480.0;

pub const GROUND_HEIGHT: f32 = 112.0;
pub const GROUND_LINE: f32 = FIELD_HEIGHT - GROUND_HEIGHT;

pub const BIRD_X: f32 = 50.0;
pub const BIRD_START_Y: f32 = 150.0;
pub const BIRD_RADIUS: f32 = 12.0;
// Per frame, not per second.
pub const GRAVITY: f32 = 0.25;
pub const JUMP_IMPULSE: f32 = 4.6;

pub const PIPE_WIDTH: f32 = 52.0;
pub const PIPE_HEIGHT: f32 = 320.0;
pub const PIPE_GAP: f32 = 100.0;
pub const PIPE_BASE_OFFSET: f32 = -150.0;
pub const PIPE_SPEED: f32 = 2.0;
pub const PIPE_SPAWN_INTERVAL: u32 = 100;

pub const FRAME_RATE: f64 = 60.0;

pub const BEST_SCORE_FILE: &str = "best.json";

pub const SCORE_POS: (f32, f32) = (FIELD_WIDTH / 2.0 - 10.0, 50.0);
pub const FINAL_SCORE_POS: (f32, f32) = (60.0, 200.0);
pub const BEST_SCORE_POS: (f32, f32) = (60.0, 240.0);
pub const READY_TEXT_POS: (f32, f32) = (80.0, 250.0);
pub const GAME_OVER_TEXT_POS: (f32, f32) = (120.0, 150.0);
pub const RESTART_TEXT_POS: (f32, f32) = (70.0, 300.0);
