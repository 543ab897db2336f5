pub mod raw;

mod analysis;
mod ingredient;
mod nutrition;
mod plan;
mod portion;
mod purchase;
mod shopping;
mod spoilage;
mod tracking;

pub use analysis::*;
pub use ingredient::*;
pub use nutrition::*;
pub use plan::*;
pub use portion::*;
pub use purchase::*;
pub use shopping::*;
pub use spoilage::*;
pub use tracking::*;
