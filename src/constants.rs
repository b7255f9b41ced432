pub const RENDER_WIDTH: i32 = 1920;           // Width of the render texture
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the render texture
pub const FPS: u32 = 60;                      // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32; // Time per frame (seconds)

pub const FLIP_DURATION: f32 = 0.6;           // Delay between an accepted flip and the index change (seconds)
pub const AUTO_ADVANCE_INTERVAL: f32 = 8.0;   // Automatic forward flip period (seconds)
pub const SLIDE_DURATION: f32 = 0.6;          // Primary region slide in/out animation (seconds)
pub const CELL_STAGGER: f32 = 0.05;           // Flip overlay delay between two neighbour cells (seconds)
pub const GRID_CELLS: usize = 8;              // Columns of the secondary region

pub const SYNC_TOLERANCE: f32 = 0.1;          // Allowed drift between cell videos (seconds)
pub const VIDEO_FPS: u32 = 30;                // Decoded frame rate of video slots
pub const DECODER_QUEUE: usize = 2;           // Frames buffered ahead per decoder

pub const HEADER_FONT_SIZE: i32 = 48;
pub const CAPTION_FONT_SIZE: i32 = 24;
pub const PANEL_FONT_SIZE: i32 = 20;
pub const PANEL_WIDTH: i32 = 720;
