//! Reusable UI building blocks
//!
//! - `keybindings` - key to action mapping and navigation bar hints

pub mod keybindings;
