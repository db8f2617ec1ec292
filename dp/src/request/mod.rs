//! Generation requests
//!
//! Task text plus the output [`Shape`] the response must satisfy.

mod builder;
mod shape;

pub use builder::{GenerationRequest, RequestBuilder, RequestKind, diet_plan_shape, store_list_shape};
pub use shape::{Field, Shape};
