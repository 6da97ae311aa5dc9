pub mod annotations;
pub mod forecast;
pub mod history;
pub mod score;
pub mod species;

pub use annotations::*;
pub use forecast::*;
pub use history::*;
pub use score::*;
pub use species::*;
