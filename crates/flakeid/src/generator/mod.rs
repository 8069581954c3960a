mod basic;
mod interface;
mod lock;
mod state;
mod status;

pub use basic::*;
pub use interface::*;
pub use lock::*;
pub use state::*;
pub use status::*;
