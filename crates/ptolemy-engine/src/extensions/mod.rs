// extensions/mod.rs
//
// Pure math helpers shared by the systems. No simulation state here.

pub mod hermite;

pub use hermite::{basis as hermite_basis, hermite, sample as hermite_sample};
