// Adapters layer: concrete collaborators behind the domain ports
// (scan sources, the visitor form, entry log export).

pub mod export;
pub mod form;
pub mod source;
