pub mod dataset;
pub mod store;
pub mod surahs;
pub mod types;

pub use store::VerseStore;
pub use surahs::surah_name;
pub use types::Verse;
