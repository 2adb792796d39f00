pub mod archive;
pub mod config;
pub mod csv;
pub mod docx;
pub mod storage;
