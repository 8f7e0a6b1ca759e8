pub mod traits;

mod artifacts;
mod consts;
mod deployments;
mod network;

pub use crate::{artifacts::*, consts::*, deployments::*, network::*};
