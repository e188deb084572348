pub mod files;
pub mod storage;
