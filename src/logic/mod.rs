pub mod category;
pub mod error;
pub mod item;
pub mod pipeline;
pub mod subcategory;

pub use category::CategoryManager;
pub use error::PipelineError;
pub use item::ItemManager;
pub use pipeline::EntityPipeline;
pub use subcategory::SubcategoryManager;
