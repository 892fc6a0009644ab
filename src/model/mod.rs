pub mod definition;
pub mod mapping;
pub mod table;
pub mod variable;

pub use definition::*;
pub use mapping::*;
pub use table::*;
pub use variable::*;
