pub mod acta;
pub mod encuentro;
pub mod geo;
pub mod item;
pub mod participant;
pub mod seed;
pub mod submission;
