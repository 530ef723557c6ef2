//! Loads applied to the frame

mod joint_load;

pub use joint_load::JointLoad;
