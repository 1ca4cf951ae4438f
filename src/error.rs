//! 错误类型定义

use crate::graph::{EdgeId, VertexId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("顶点不存在: {0}")]
    VertexNotFound(VertexId),

    #[error("边不存在: {0}")]
    EdgeNotFound(EdgeId),

    #[error("不支持自环边: 顶点 {0}")]
    SelfLoop(VertexId),

    #[error("匹配无效: {0}")]
    InvalidMatching(String),

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("导入错误: {0}")]
    ImportError(String),

    #[error("序列化错误: {0}")]
    SerializationError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}
