//! Testing utilities and harness for strata

pub mod assertions;
pub mod policies;
pub mod tree;

pub use assertions::*;
pub use policies::*;
pub use tree::*;

pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::policies::*;
    pub use crate::tree::*;
}
