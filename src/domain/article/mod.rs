pub mod model;
pub mod repository;

// 公開APIの再エクスポート

// model.rsから
pub use model::{Article, Collection, SourceTag, UNKNOWN_PUBLISHED};

// repository.rsから
pub use repository::ArticleStore;
