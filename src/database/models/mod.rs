pub mod creator;
pub mod genre;
pub mod show;

pub use creator::{Creator, NewCreator};
pub use genre::{Genre, NewGenre};
pub use show::{NewShow, Show, ShowSummary};
