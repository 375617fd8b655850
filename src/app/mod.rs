pub mod archive;
pub mod ingest;
pub mod live;
pub mod report;
