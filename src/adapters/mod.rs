// Adapters layer: concrete clients for the external tagging and validation
// collaborators. The core only sees the Tagger/Validator ports.

pub mod http;
