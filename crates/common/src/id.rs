//! ID generation utilities.

use ulid::Ulid;

/// Prefix shared by every primary key the service generates.
pub const ID_PREFIX: &str = "phi";

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new prefixed ULID-based ID, e.g. `phi01hx3k...`.
    ///
    /// ULIDs are lexicographically sortable, so ordering by ID follows creation time
    /// across milliseconds.
    #[must_use]
    pub fn generate(&self) -> String {
        format!("{ID_PREFIX}{}", Ulid::new().to_string().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_prefixed_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert!(id1.starts_with(ID_PREFIX));
        assert_eq!(id1.len(), 29);
        assert_eq!(id1, id1.to_lowercase());
        assert_ne!(id1, id2);
    }
}
