use crate::infra::parser::parse_channel_from_reader;
use anyhow::{Context, Result};
use rss::Channel;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

/// ファイルパスからBufReaderを作成する
/// パースやデータ変換は各ドメインで行う
pub fn load_file(file_path: &str) -> Result<BufReader<File>> {
    let file = File::open(file_path)
        .with_context(|| format!("ファイルの読み込みに失敗しました: {}", file_path))?;
    let buf_reader = BufReader::new(file);
    Ok(buf_reader)
}

/// ファイル全体を文字列として読み込む
pub fn load_text_from_file(file_path: &str) -> Result<String> {
    let mut buf_reader = load_file(file_path)?;
    let mut text = String::new();
    buf_reader
        .read_to_string(&mut text)
        .with_context(|| format!("テキストファイルの読み込みに失敗: {}", file_path))?;
    Ok(text)
}

/// xmlファイルからchannelを読み込む
pub fn load_channel_from_xml_file(file_path: &str) -> Result<Channel> {
    let buf_reader = load_file(file_path)?;
    parse_channel_from_reader(buf_reader)
        .with_context(|| format!("RSSファイルの解析に失敗: {}", file_path))
}

/// YAMLファイルからSerdeでDeserializeできる型を読み込む
pub fn load_yaml_from_file<T: DeserializeOwned>(file_path: &str) -> Result<T> {
    let buf_reader = load_file(file_path)?;
    serde_yaml::from_reader(buf_reader)
        .with_context(|| format!("YAMLファイルの解析に失敗: {}", file_path))
}

/// Serializeできる値を整形済みJSONとしてファイルに書き出す
pub fn save_json_to_file<T: Serialize + ?Sized>(value: &T, file_path: &str) -> Result<()> {
    let file = File::create(file_path)
        .with_context(|| format!("ファイルの作成に失敗しました: {}", file_path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("JSONの書き出しに失敗: {}", file_path))?;
    writer
        .flush()
        .with_context(|| format!("ファイルの書き込みに失敗: {}", file_path))?;
    Ok(())
}
