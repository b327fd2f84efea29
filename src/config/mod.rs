//! Workout documents
//!
//! Loads user-authored YAML (or JSON) workout files into validated
//! [`WorkoutDefinition`](crate::workout::WorkoutDefinition)s.
//!
//! # Pipeline
//!
//! 1. Size check against [`ConfigLimits`]
//! 2. YAML parsing into [`schema::WorkoutFile`]
//! 3. Validation with [`Validator`], collecting every issue
//! 4. Construction of the definition

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, LoadResult, LoaderOptions, WorkoutLoader};
pub use schema::{DurationValue, ExerciseDocument, TimingDocument, WorkoutDocument, WorkoutFile};
pub use validation::{ValidationResult, Validator};
