pub mod catalog;
pub mod document;
