//! # Populator
//!
//! Compute a new value for every record in a collection of JSON items and
//! write it back at a path.
//!
//! ## Usage
//!
//! ```
//! use populator::{populate, PopulateOptions};
//! use serde_json::{json, Value};
//!
//! let mut users = vec![json!({"email": "a@x.com"}), json!({"email": "b@x.com"})];
//!
//! populate(
//!     &mut users,
//!     "email",
//!     PopulateOptions::with_aggregate(
//!         |emails| {
//!             let all: Vec<&str> = emails.iter().flatten().filter_map(Value::as_str).collect();
//!             Ok(all.join(","))
//!         },
//!         |email, all| {
//!             let email = email.and_then(Value::as_str).unwrap_or_default();
//!             Ok(json!(format!("{}|{}", email.to_uppercase(), all)))
//!         },
//!     )
//!     .write_as("emailUppercase"),
//! )?;
//!
//! assert_eq!(users[0]["emailUppercase"], "A@X.COM|a@x.com,b@x.com");
//! # Ok::<(), populator::PopulateError>(())
//! ```
//!
//! ## Modules
//!
//! - `accessor` - Dotted path reads and writes on JSON records
//! - `populate` - The populate loop, its options and serializable configuration
//! - `error` - Error type and error code registry
pub mod accessor;
pub mod error;
pub mod populate;

pub use accessor::FieldPath;
pub use error::{PopulateError, PopulateResult};
pub use populate::{
    populate, populate_async, AsyncPopulateOptions, PopulateConfig, PopulateOptions,
};
