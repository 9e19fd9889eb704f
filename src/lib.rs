//! ocmt: Extractor → CDS View マッチングクライアント
//!
//! サービスへの送信、結果のテーブル表示・説明・JSON/CSV出力を行う。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod explain;
pub mod export;
pub mod inputs;
pub mod runner;
pub mod table;
