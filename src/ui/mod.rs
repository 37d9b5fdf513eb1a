mod output;

pub use output::display_turn;
