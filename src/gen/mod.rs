pub mod attack;
pub mod between;
pub mod magic;
pub mod ray;
pub mod tables;
