//! Keyboard Input Module
//!
//! Configurable keybindings: actions, bindings, the exact-set match
//! predicate against captured key events, and the rebinding capture state
//! machine.

pub mod keybind;

pub use keybind::{Action, Binding, BindingCapture, BindingTable, KeyEvent};
