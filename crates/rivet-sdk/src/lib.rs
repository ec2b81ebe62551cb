//! # rivet-sdk
//!
//! Public SDK for using Rivet as a library.
//!
//! The [`Injector`](injector::Injector) owns a type catalog together with the
//! current binding and value tables, and builds fresh object graphs on
//! request.
//!
//! # Example
//!
//! ```rust
//! use rivet_sdk::{Injector, TypeCatalog, TypeDescriptor, ValueDirective};
//!
//! #[derive(Default)]
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! let catalog = TypeCatalog::new().with(
//!     TypeDescriptor::of::<Greeter>("app.Greeter")
//!         .default_constructor()
//!         .value_field("greeting", ValueDirective::new("greeting"), |g: &mut Greeter, s: String| {
//!             g.greeting = s;
//!         })
//!         .build(),
//! );
//! let mut injector = Injector::new(catalog);
//! let _ = injector.load_values_str("greeting=hello\n")?;
//! let greeter: Greeter = injector.construct_as("app.Greeter")?;
//! assert_eq!(greeter.greeting, "hello");
//! # Ok::<(), rivet_sdk::RivetError>(())
//! ```

pub mod injector;

pub use injector::Injector;
pub use rivet_coerce::ValueDirective;
pub use rivet_common::config::{FailurePolicy, InjectorSettings};
pub use rivet_common::error::{Result, RivetError};
pub use rivet_common::types::TypeName;
pub use rivet_container::{
    Arguments, DependencyPlan, Instance, ParamDescriptor, TypeCatalog, TypeDescriptor,
};
