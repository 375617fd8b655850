pub mod archive;
pub mod article;
pub mod classifier;
pub mod feed;
pub mod region;
pub mod rss;
pub mod report;
pub mod tokenizer;
