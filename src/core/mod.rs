pub mod copier;
pub mod duration;
pub mod naming;
pub mod parser;
