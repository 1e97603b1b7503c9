pub mod category;
pub mod score;
pub mod table;

pub use category::*;
pub use score::*;
pub use table::*;
