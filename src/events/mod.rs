pub mod gesture;
pub mod pointer;

pub use gesture::{wire_pinch_handlers, wire_wheel};
pub use pointer::{wire_input_handlers, InputWiring};
