// UI module - handles all user interface rendering

mod genesis;
mod stats;
mod ui;

// Re-export the public interface
pub use genesis::{Launch, draw_genesis_screen};
pub use ui::{TrainingView, UIState, draw_ui, process_egui};
