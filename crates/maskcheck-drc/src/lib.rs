//! # MaskCheck DRC
//!
//! Design Rule Checking over layer-tagged rectangles.
//! Rules come from an immutable [`RuleTable`], built in code or loaded from a
//! JSON [`RuleDeck`]. [`DrcEngine::check`] runs the width, spacing and
//! enclosure passes over a shape snapshot and returns the violations in a
//! fixed, deterministic order.

pub mod deck;
pub mod enclosure;
pub mod engine;
pub mod report;
pub mod rules;
pub mod spacing;
pub mod violation;
pub mod width;

pub use deck::{DeckError, RuleDeck};
pub use engine::DrcEngine;
pub use report::DrcReport;
pub use rules::{RuleError, RuleTable, RuleTableBuilder};
pub use violation::{DrcViolation, Offenders, ViolationKind};
