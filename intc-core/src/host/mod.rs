pub mod host;
pub mod rng;

pub mod prelude {
    pub use super::{
        host::*,
        rng::*
    };
}

#[cfg(test)]
mod tests;
