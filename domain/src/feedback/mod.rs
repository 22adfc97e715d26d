//! User feedback on logged tasks.

pub mod value_objects;
