pub mod game;

// The viewport keeps the field's 2:3 shape with cells roughly twice as tall as wide.
pub const MIN_VIEW_WIDTH: u16 = 20;
pub const MIN_VIEW_HEIGHT: u16 = 15;
