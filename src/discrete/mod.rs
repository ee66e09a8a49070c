pub mod simple_og;

pub use simple_og::*;
