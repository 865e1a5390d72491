//! Macro for implementing Display and FromStr for keyword enums
//!
//! Query parameters, context types and backend kinds all travel as short
//! lowercase keywords (`"days"`, `"month"`, `"local"`). This macro derives
//! both directions of that mapping from a single table.
//!
//! # Example
//!
//! ```rust
//! use timetrail_domain::impl_keyword_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Granularity {
//!     Day,
//!     Month,
//! }
//!
//! impl_keyword_conversions!(Granularity {
//!     Day => "day",
//!     Month => "month",
//! });
//!
//! assert_eq!(Granularity::Day.to_string(), "day");
//! assert_eq!("MONTH".parse::<Granularity>(), Ok(Granularity::Month));
//! ```

/// Implements Display, FromStr and `as_str` for keyword enums
///
/// Parsing is case-insensitive and ignores surrounding whitespace; display
/// always produces the table's lowercase keyword.
#[macro_export]
macro_rules! impl_keyword_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Keyword for this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
