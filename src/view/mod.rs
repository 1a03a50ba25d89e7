pub mod render;
pub mod state;

pub use state::{Action, Pagination, Speaker, ThemeMode, Turn, ViewState};
