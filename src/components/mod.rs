pub mod country_card;
pub mod filter_bar;
pub mod status;

pub use country_card::*;
pub use filter_bar::*;
pub use status::*;
