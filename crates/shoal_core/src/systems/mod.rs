pub mod biology;
pub mod flocking;
pub mod food_chain;
pub mod locomotion;
pub mod school;
pub mod tick;
