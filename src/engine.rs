use raylib::prelude::*;

use crate::error::Result;

pub trait Engine {
    fn initialize(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) -> Result<()>;
    fn handle_input(&mut self, rl: &mut RaylibHandle);
    fn render_frame(&mut self, dt: f32, rl: &mut RaylibHandle, thread: &RaylibThread, framebuffer: &mut RenderTexture2D);
    fn teardown(&mut self);
}
