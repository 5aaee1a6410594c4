pub mod coords;
pub mod kinematics;
pub mod time;
