pub mod score_bar;

pub use score_bar::{render_bar, ScoreBar};
