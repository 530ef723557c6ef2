//! Structural elements module

mod element;
mod joint;
mod material;
mod restraint;
mod section;

pub use element::Element;
pub use joint::Joint;
pub use material::Material;
pub use restraint::Restraint;
pub use section::Section;
