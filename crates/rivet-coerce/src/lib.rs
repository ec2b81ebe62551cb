//! # rivet-coerce
//!
//! Coercion engine turning raw configuration strings into typed values.
//!
//! Handles:
//! - **Shape**: The closed set of coercion targets and their textual form.
//! - **Scalar**: Acceptance predicates and parsers for bool, int and string.
//! - **Composite**: Bracketed, delimited arrays, lists, sets and maps.
//! - **Resolve**: Value directives, store lookup and shape dispatch.
//! - **Injectable**: Mapping from Rust types to shapes and back.

pub mod composite;
pub mod directive;
pub mod injectable;
pub mod resolve;
pub mod scalar;
pub mod shape;
pub mod value;

pub use directive::ValueDirective;
pub use injectable::{FromScalar, Injectable};
pub use resolve::{Coerced, ValueSource, coerce, resolve};
pub use shape::{InjectableShape, ScalarKind};
pub use value::{Scalar, Value};
