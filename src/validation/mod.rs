//! Business validation of a submitted acta.
//!
//! Each stage returns the list of human-readable messages it produced; an
//! empty list means the stage passed. Storage failures are `Err`.

pub mod cedula;
pub mod geo;
pub mod items;
pub mod participants;
pub mod rut;

pub use cedula::{CedulaVerifier, DocumentVerifier, RegistryVerifier, SerialFormatVerifier};
pub use geo::validate_geo;
pub use items::validate_items;
pub use participants::validate_participants;
pub use rut::verify_rut;
