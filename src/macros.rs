//! Declarative macros for reducing boilerplate in the engine's input records.
//!
//! The `zakat_fields!` macro generates a field-selector enum for a record
//! struct together with a typed `FieldAccess` impl, so a host can bind form
//! field names (`"goldWeight"` or `"gold_weight"`) straight to engine updates.

/// Macro for generating a field-selector enum over a struct's fields.
///
/// This macro generates:
/// - The enum, with `Display`/`AsRefStr` giving the camelCase name and serde
///   using the snake_case name
/// - `FromStr`, accepting either name case-insensitively
/// - `field_name()`, returning the snake_case name
/// - A [`FieldAccess`](crate::traits::FieldAccess) impl on the owning struct
///
/// # Usage
///
/// ```rust,ignore
/// zakat_fields! {
///     /// Documentation for the enum
///     pub enum MyField for MyRecord: Decimal {
///         Cash => cash,
///         GoldWeight => gold_weight,
///     }
/// }
/// ```
#[macro_export]
macro_rules! zakat_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident for $owner:ty : $value:ty {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $field:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            strum::Display, strum::AsRefStr, strum::EnumIter,
        )]
        #[serde(rename_all = "snake_case")]
        #[strum(serialize_all = "camelCase")]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// The snake_case name of the underlying struct field.
            pub fn field_name(&self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($field), )*
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::types::ZakatError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                <$name as strum::IntoEnumIterator>::iter()
                    .find(|f| {
                        f.as_ref().eq_ignore_ascii_case(wanted)
                            || f.field_name().eq_ignore_ascii_case(wanted)
                    })
                    .ok_or_else(|| $crate::types::ZakatError::InvalidInput {
                        field: stringify!($name).to_string(),
                        value: wanted.to_string(),
                        reason: "is not a known field".to_string(),
                    })
            }
        }

        impl $crate::traits::FieldAccess<$name> for $owner {
            type Value = $value;

            fn get(&self, field: $name) -> $value {
                match field {
                    $( $name::$variant => self.$field, )*
                }
            }

            fn set(&mut self, field: $name, value: $value) {
                match field {
                    $( $name::$variant => self.$field = value, )*
                }
            }
        }
    };
}
