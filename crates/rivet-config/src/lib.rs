//! # rivet-config
//!
//! The two configuration tables an injector reads during construction.
//!
//! Handles:
//! - **Store**: Configuration key to raw string value.
//! - **Binding**: Abstract type name to concrete type name.
//! - **Properties**: Parsing of `.properties` text into ordered entries.
//!
//! Both tables are replaced wholesale. A load parses and validates into a
//! fresh table first, so a failed load leaves the previous contents intact.

pub mod binding;
pub mod properties;
pub mod store;

pub use binding::BindingRegistry;
pub use store::ValueStore;
