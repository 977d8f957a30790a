//! Core data models for the meta analyzer.

mod records;
mod role;
mod snapshot;

pub use records::*;
pub use role::*;
pub use snapshot::*;

/// Normalize a map or agent name into the lowercase join key used
/// throughout the crate.
pub fn join_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_key_lowercases_and_trims() {
        assert_eq!(join_key("  Ascent "), "ascent");
        assert_eq!(join_key("JETT"), "jett");
        assert_eq!(join_key("kay/o"), "kay/o");
    }
}
