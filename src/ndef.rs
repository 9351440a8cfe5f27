// Re-export the tagwire-ndef crate
pub use tagwire_ndef::*;
