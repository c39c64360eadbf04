pub mod catalog;
pub mod kinematics;
pub mod scene;
pub mod time;
