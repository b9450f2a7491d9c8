//! Rules
//!
//! Declarative path rules and their compiled form:
//! - `pattern`: marker lists such as `["{", "Telemetry", "[", "{"]`
//! - `rule`: the user-facing declaration with its action
//! - `compiler`: symbol resolution and depth indexing

pub mod compiler;
pub mod pattern;
pub mod rule;

pub use compiler::{CompiledRule, RuleSet};
pub use pattern::{parse_markers, PathMarker};
pub use rule::{Action, Rule};
