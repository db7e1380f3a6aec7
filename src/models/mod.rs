pub mod bar;
pub mod info;
