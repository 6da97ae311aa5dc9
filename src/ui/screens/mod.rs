pub mod overview;
pub mod species;

pub use overview::OverviewScreen;
pub use species::SpeciesScreen;
