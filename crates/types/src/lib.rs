mod artifact;
mod dao;
mod deployment;
mod token;

pub use artifact::*;
pub use dao::*;
pub use deployment::*;
pub use token::*;
