pub mod stage0_normalize;
pub mod stage1_dedup;
pub mod stage2_reconcile;
pub mod stage3_dates;
pub mod stage4_categories;
pub mod stage5_export;

pub use stage0_normalize::*;
pub use stage1_dedup::*;
pub use stage2_reconcile::*;
pub use stage3_dates::*;
pub use stage4_categories::*;
pub use stage5_export::*;
