use crate::types::ZakatError;

/// Checks a partially-assembled value before it is built.
pub trait Validate {
    fn validate(&self) -> Result<(), ZakatError>;
}

/// Trait for builders that produce a validated configuration object.
pub trait Builder<T> {
    /// Builds the final object, returning a Result.
    fn build(self) -> Result<T, ZakatError>;
}
