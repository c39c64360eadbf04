pub mod picking;
pub mod queue;
pub mod selection;

pub use picking::{intersect_sphere, pick, Pick, PickCandidate, Ray};
pub use queue::{InputEvent, InputQueue};
pub use selection::Selection;
