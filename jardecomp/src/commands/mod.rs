pub mod entries;
pub mod name;
pub mod replay;
pub mod resolve;
