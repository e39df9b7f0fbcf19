//! Macro for implementing Display and FromStr for wire-level enums
//!
//! The backend speaks lowercase snake_case strings for every enum it exposes
//! (`"in_progress"`, `"admin"`, `"pending"`). This macro keeps `Display` and
//! `FromStr` in lockstep with those strings.
//!
//! # Example
//!
//! ```rust
//! use kanflow_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Column {
//!     Todo,
//!     Done,
//! }
//!
//! impl_domain_status_conversions!(Column {
//!     Todo => "todo",
//!     Done => "done",
//! });
//!
//! assert_eq!(Column::Todo.to_string(), "todo");
//! assert_eq!("DONE".parse::<Column>().unwrap(), Column::Done);
//! ```

/// Implements Display and FromStr traits for wire-level enums
///
/// Parsing is case-insensitive; output always uses the declared string.
#[macro_export]
macro_rules! impl_domain_status_conversions {
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
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
