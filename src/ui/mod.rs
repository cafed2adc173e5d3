//! Terminal presentation of the selection state.

pub mod components;
pub mod options;
