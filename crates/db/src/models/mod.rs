//! Row structs and their conversions into domain types.
//!
//! Each submodule contains `FromRow` structs matching database rows and
//! `TryFrom` conversions into the `datapage-core` node/view types
//! (parsing the stored `type` strings and settings JSON).

pub mod form;
pub mod response;
pub mod user;
