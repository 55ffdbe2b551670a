//! # Configuration Dialects
//!
//! Turns raw command-line dumps into labeled blocks and answers the
//! dialect-dependent questions the builder asks: what an abbreviated interface
//! name stands for, and whether the device looks like a router or a switch.
//!
//! * [`profile`]: keyword and abbreviation tables per command syntax family.
//! * [`tokenizer`]: line scanner producing [`tokenizer::Block`]s.
//! * [`names`]: interface-name normalization.
//! * [`classify`]: router/switch heuristics.
//! * [`extract`]: text decoding and best-effort extraction from binary files.

pub mod classify;
pub mod extract;
pub mod names;
pub mod profile;
pub mod tokenizer;

pub use classify::{Classification, classify_role};
pub use profile::DialectProfile;
pub use tokenizer::{Block, BlockKind, Line, tokenize};
