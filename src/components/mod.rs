pub mod toasts;
pub mod ui;
