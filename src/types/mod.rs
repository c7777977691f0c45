mod device;
mod form;
mod update;

pub use device::*;
pub use form::*;
pub use update::*;
