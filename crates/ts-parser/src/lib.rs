mod script;

pub use script::parse_script;
