pub mod node;
pub mod state;
pub mod view;
