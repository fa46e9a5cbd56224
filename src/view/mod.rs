pub mod pages;
pub mod tables;
