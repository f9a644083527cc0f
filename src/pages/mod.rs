mod detail;
mod home;

pub use detail::CountryDetailPage;
pub use home::HomePage;
