pub mod console;

pub use console::{render_board, render_json, save_report, ConsolePresenter, JsonPresenter};
