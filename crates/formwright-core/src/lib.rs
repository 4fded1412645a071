//! # formwright-core
//!
//! Core data structures for the formwright form engine.
//!
//! This crate provides the fundamental types used throughout formwright:
//! - [`Field`] and [`FormSchema`] - The form definition
//! - [`FieldValue`], [`ValueSnapshot`], [`ErrorSnapshot`] - Entered values and their errors
//! - [`ValidationRule`] and [`validate_field_value`] - Per-field value validation
//!
//! ## Example
//!
//! ```rust
//! use formwright_core::{validate_field_value, Field, FieldKind, FieldValue, ValidationRule};
//!
//! let field = Field::new("email", FieldKind::Text, "Email")
//!     .with_required(true)
//!     .with_rule(ValidationRule::email("Enter a valid email"));
//!
//! assert_eq!(
//!     validate_field_value(&field, &FieldValue::Null),
//!     Some("Email is required".to_string())
//! );
//! assert_eq!(
//!     validate_field_value(&field, &"someone@example".into()),
//!     Some("Enter a valid email".to_string())
//! );
//! assert_eq!(validate_field_value(&field, &"someone@example.com".into()), None);
//! ```

pub mod error;
pub mod field;
pub mod schema;
pub mod validation;
pub mod value;

// Re-exports for convenience
pub use error::Error;
pub use field::{Field, FieldKind};
pub use schema::FormSchema;
pub use validation::{validate_all_fields, validate_field_value, RuleKind, ValidationRule};
pub use value::{format_number, ErrorSnapshot, FieldValue, ValueSnapshot};

/// Minimum length a value must have to satisfy a password rule
pub const MIN_PASSWORD_LEN: usize = 8;
