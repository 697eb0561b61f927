pub mod config;
pub mod garden;
pub mod input;
pub mod layout;
pub mod render;
pub mod runtime;
pub mod scene;
pub mod view;
pub mod wasm_api;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GardenError {
    /// Editor configuration could not be parsed or serialized.
    Config,
    /// A file backing the configuration could not be read.
    Io,
}

impl fmt::Display for GardenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GardenError::Config => write!(f, "invalid editor configuration"),
            GardenError::Io => write!(f, "failed to read editor configuration"),
        }
    }
}

impl std::error::Error for GardenError {}

pub type Result<T> = std::result::Result<T, error_stack::Report<GardenError>>;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub mod prelude {
    pub use crate::config::*;
    pub use crate::garden::*;
    pub use crate::input::*;
    pub use crate::layout::*;
    pub use crate::render::*;
    pub use crate::runtime::*;
    pub use crate::scene::*;
    pub use crate::view::*;
}
