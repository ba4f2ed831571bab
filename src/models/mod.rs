mod case;
mod contact;
mod dataset;
mod id;
mod insight;
mod settings;
mod task;

pub use case::*;
pub use contact::*;
pub use dataset::*;
pub use id::generate_id;
pub use insight::*;
pub use settings::*;
pub use task::*;
