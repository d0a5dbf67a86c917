//! CLI command implementations.

pub(crate) mod bars;
pub(crate) mod contracts;
pub(crate) mod decode;
pub(crate) mod underlyings;
