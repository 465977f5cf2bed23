//! Render strategies and the self-inspection entry points built on them.

pub mod components;
pub mod renderer;
pub mod renders;
pub mod traits;

pub use components::*;
pub use renderer::*;
pub use renders::*;
pub use traits::*;
