//! Concrete filters built on the [`filter`](crate::filter) strategies.
//!
//! Each filter is a serde-deserializable parameter struct with per-field
//! defaults and a `validate` method that rejects out-of-domain values before
//! any pixel work.

pub mod blur;
pub mod cellular;
pub mod emboss;
pub mod lookup;
pub mod marble;
pub mod oil;
pub mod pointillize;
pub mod sparkle;
pub mod stamp;

pub use blur::GaussianBlur;
pub use cellular::{CellularField, Feature, GridType};
pub use emboss::Emboss;
pub use lookup::{ColormapFilter, Lookup};
pub use marble::Marble;
pub use oil::Oil;
pub use pointillize::Pointillize;
pub use sparkle::Sparkle;
pub use stamp::Stamp;
