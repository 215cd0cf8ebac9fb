/// Typed access to one field of an input record, selected by a field enum.
///
/// Implemented by the `zakat_fields!` macro. A record may implement this for
/// several selector enums, e.g. `AssetPortfolio` for both `AssetField` and
/// `ConditionFlag`; the argument type picks the impl.
pub trait FieldAccess<F> {
    type Value;

    /// Reads the selected field.
    fn get(&self, field: F) -> Self::Value;

    /// Overwrites the selected field without any validation.
    fn set(&mut self, field: F, value: Self::Value);
}
