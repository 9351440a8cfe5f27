pub mod logging;
pub mod ndef;
pub mod tag;

uniffi::setup_scaffolding!();
