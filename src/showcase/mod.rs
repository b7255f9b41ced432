pub mod engine;
pub mod layout;
pub mod lineup;
pub mod media;
pub mod panel;
pub mod slide;
