// Value types: parameters, URIs and the lazily parsed header values built
// from them.

pub mod header_value;
pub mod lazy;
pub mod name_addr;
pub mod param;
pub mod param_list;
pub mod raw;
pub mod uri;
pub mod uri_value;
