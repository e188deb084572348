pub mod files;

pub use files::FileStore;
