pub mod bike;
pub mod business_model;
pub mod chemistry;
pub mod energy;
pub mod fleet;
pub mod pack;
pub mod simulation;
pub mod thermal;
