//! **omni-rl** — the algorithmic core of omni: deterministic line
//! rasterization, field-of-view computation, and flood-fill reachability.

pub mod flood;
pub mod fov;
pub mod line;

pub use flood::flood;
pub use fov::{FillStrategy, SightShape, Visibility};
pub use line::trace;
