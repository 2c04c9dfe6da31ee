pub mod analysis;
pub mod dashboard;
pub mod job;
pub mod skill;
