//! # rivet-container
//!
//! Object-graph construction for the Rivet injector.
//!
//! Handles:
//! - **Descriptor**: Statically declared constructors, parameters and fields.
//! - **Arguments**: Typed access to resolved constructor arguments.
//! - **Catalog**: Registry of type descriptors and abstract type names.
//! - **Builder**: Recursive construction with binding resolution, value
//!   coercion and field injection.
//! - **Guard**: Per-call construction stack for cycle detection.
//! - **Plan**: Static dependency graph and construction order.

pub mod arguments;
pub mod builder;
pub mod catalog;
pub mod descriptor;
pub mod guard;
pub mod plan;

pub use arguments::Arguments;
pub use builder::ObjectGraphBuilder;
pub use catalog::TypeCatalog;
pub use descriptor::{
    ConstructorDescriptor, FieldDescriptor, FieldKind, Injection, Instance, ParamDescriptor,
    TypeDescriptor, TypeDescriptorBuilder,
};
pub use plan::DependencyPlan;
