//! インフラ層
//!
//! HTTP通信、フィード・HTML・日付の解析、データベース、ファイル入出力を提供する。

pub mod api {
    pub mod http;
}
pub mod db;
pub mod parser;
pub mod storage {
    pub mod file;
}
