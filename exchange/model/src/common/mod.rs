mod enums;
mod location;

pub use enums::*;
pub use location::*;
