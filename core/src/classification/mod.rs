//! Rule-driven routing of acquired series to output keys
//!
//! [`classify`] is the engine: a pure pass over records and rules.
//! [`Heuristic`] wraps a validated key catalog and rule table, loaded from
//! JSON or taken from the built-in site heuristics.

mod engine;
mod heuristic;
mod sites;

pub use engine::{classify, ClassificationResult, ResultEntry};
pub use heuristic::{Heuristic, HeuristicConfig, KeyConfig, NamedKey, RuleConfig};
