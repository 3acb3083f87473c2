pub mod commands;
pub mod cue;
pub mod error;
pub mod playlist;
pub mod tag;
pub mod util;
