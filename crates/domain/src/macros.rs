//! Macro for implementing Display and FromStr for provider wire enums
//!
//! Calendar providers spell enum values in camelCase (`needsAction`). The
//! generated `FromStr` accepts any ASCII casing so that payloads from
//! different API versions still parse, while `Display` always emits the
//! canonical spelling.
//!
//! # Example
//!
//! ```rust
//! use roombook_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Visibility {
//!     Default,
//!     Private,
//! }
//!
//! impl_wire_enum_conversions!(Visibility {
//!     Default => "default",
//!     Private => "private",
//! });
//!
//! assert_eq!("PRIVATE".parse::<Visibility>().unwrap(), Visibility::Private);
//! ```

/// Implements Display and FromStr traits for wire enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their canonical wire
///   spelling
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
