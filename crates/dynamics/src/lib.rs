//! Point-mass dynamics: bodies, gravity sources, and per-step updates.

pub mod body;
pub mod gravity;
pub mod sources;

pub use body::{Body, accelerate_all, integrate_all};
pub use gravity::{CollisionError, NewtonianGravity};
pub use sources::{SourceSetError, SourceSets};
