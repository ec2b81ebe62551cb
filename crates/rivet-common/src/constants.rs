//! Workspace-wide constants.

/// Delimiter used by a value directive when none is given.
pub const DEFAULT_DELIMITER: &str = ",";

/// Separator between key and value inside a map entry.
pub const MAP_ENTRY_SEPARATOR: char = ':';

/// Conventional file name of the binding table.
pub const DEFAULT_BINDINGS_FILE: &str = "inject.properties";

/// Conventional file name of the value table.
pub const DEFAULT_VALUES_FILE: &str = "value.properties";
