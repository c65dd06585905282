use std::hash::Hash;

/// Capability required from the items of a sequence.
///
/// Two symbols equal under `==` must produce the same hash. `Clone` is
/// needed because contexts and generated sequences own their symbols.
pub trait Symbol: Eq + Hash + Clone {}

impl<T: Eq + Hash + Clone> Symbol for T {}
