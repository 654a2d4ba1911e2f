//! Motor de ejecución: fachada `Flow`, scheduler por nodo y selección.

pub mod core;
mod describe;
mod select;

pub use core::{create, DoneFn, Flow};
pub use describe::DescribeCtx;
