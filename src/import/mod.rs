//! 数据导入模块
//!
//! 从 CSV、JSON Lines 边表构建图

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// 导入统计
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub vertices_imported: usize,
    pub edges_imported: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

/// 未指定顶点数时允许的最大顶点编号
pub const DEFAULT_MAX_VERTICES: usize = 10_000_000;

/// 边表记录（JSON 格式）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct EdgeRecord {
    u: u32,
    v: u32,
}

/// 边表导入器
#[derive(Debug, Clone)]
pub struct EdgeListImporter {
    vertex_count: Option<usize>,
    max_vertices: usize,
    batch_size: usize,
    strict: bool,
}

impl Default for EdgeListImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeListImporter {
    /// 创建导入器
    pub fn new() -> Self {
        Self {
            vertex_count: None,
            max_vertices: DEFAULT_MAX_VERTICES,
            batch_size: 10000,
            strict: false,
        }
    }

    /// 固定顶点数（否则取出现过的最大顶点编号）
    pub fn with_vertex_count(mut self, n: usize) -> Self {
        self.vertex_count = Some(n);
        self
    }

    /// 顶点数上限（默认 [`DEFAULT_MAX_VERTICES`]）
    ///
    /// 编号超出上限的记录按错误记录处理；固定的顶点数也不得超过上限
    pub fn with_max_vertices(mut self, n: usize) -> Self {
        self.max_vertices = n;
        self
    }

    /// 设置批次大小（每处理一批输出一次进度日志）
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// 严格模式：遇到第一条错误记录即失败，而不是跳过
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// 从 CSV 文件导入（每行 `u,v`）
    pub fn import_csv<P: AsRef<Path>>(&self, path: P) -> Result<(Graph, ImportStats)> {
        let file = File::open(path)?;
        self.import_csv_reader(file)
    }

    /// 从任意 CSV 输入导入
    ///
    /// 首行若不是数字则视为表头；`#` 开头的行为注释
    pub fn import_csv_reader<R: Read>(&self, reader: R) -> Result<(Graph, ImportStats)> {
        let start = Instant::now();
        let limit = self.vertex_limit()?;
        let mut stats = ImportStats::default();
        let mut pairs = Vec::new();

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        for (i, record) in csv_reader.records().enumerate() {
            let line = i + 1;
            let parsed = record
                .map_err(|e| Error::ParseError(format!("记录 {}: {}", line, e)))
                .and_then(|r| {
                    if r.len() < 2 {
                        return Err(Error::ParseError(format!("记录 {}: 需要两列", line)));
                    }
                    match (r[0].parse::<u32>(), r[1].parse::<u32>()) {
                        (Ok(u), Ok(v)) => Ok(Some((u, v))),
                        // 表头
                        (Err(_), Err(_)) if line == 1 => Ok(None),
                        _ => Err(Error::ParseError(format!(
                            "记录 {}: 无法解析顶点编号 {:?}",
                            line,
                            r.iter().collect::<Vec<_>>()
                        ))),
                    }
                });

            match parsed {
                Ok(Some(pair)) => self.accept(pair, line, limit, &mut pairs, &mut stats)?,
                Ok(None) => {}
                Err(e) => self.reject(e, &mut stats)?,
            }
            self.progress(line);
        }

        self.finish(pairs, stats, start)
    }

    /// 从 JSON Lines 文件导入（每行 `{"u": 1, "v": 2}`）
    pub fn import_jsonl<P: AsRef<Path>>(&self, path: P) -> Result<(Graph, ImportStats)> {
        let file = File::open(path)?;
        self.import_jsonl_reader(BufReader::new(file))
    }

    /// 从任意 JSON Lines 输入导入，空行忽略
    pub fn import_jsonl_reader<R: BufRead>(&self, reader: R) -> Result<(Graph, ImportStats)> {
        let start = Instant::now();
        let limit = self.vertex_limit()?;
        let mut stats = ImportStats::default();
        let mut pairs = Vec::new();

        for (i, text) in reader.lines().enumerate() {
            let line = i + 1;
            let text = text?;
            if text.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<EdgeRecord>(&text) {
                Ok(record) => {
                    self.accept((record.u, record.v), line, limit, &mut pairs, &mut stats)?
                }
                Err(e) => self.reject(
                    Error::ParseError(format!("记录 {}: JSON 解析错误: {}", line, e)),
                    &mut stats,
                )?,
            }
            self.progress(line);
        }

        self.finish(pairs, stats, start)
    }

    /// 检查顶点编号并收下一条边
    fn accept(
        &self,
        (u, v): (u32, u32),
        line: usize,
        limit: u32,
        pairs: &mut Vec<(u32, u32)>,
        stats: &mut ImportStats,
    ) -> Result<()> {
        for x in [u, v] {
            if x == 0 || x > limit {
                return self.reject(
                    Error::ImportError(format!(
                        "记录 {}: 顶点 {} 超出范围",
                        line,
                        VertexId::new(x)
                    )),
                    stats,
                );
            }
        }
        if u == v {
            return self.reject(
                Error::ImportError(format!("记录 {}: 自环边 {}-{}", line, u, v)),
                stats,
            );
        }
        pairs.push((u, v));
        Ok(())
    }

    /// 允许的最大顶点编号：固定顶点数，否则为上限
    fn vertex_limit(&self) -> Result<u32> {
        let Some(n) = self.vertex_count else {
            return Ok(u32::try_from(self.max_vertices).unwrap_or(u32::MAX));
        };
        if n > self.max_vertices {
            return Err(Error::ImportError(format!(
                "顶点数 {} 超过上限 {}",
                n, self.max_vertices
            )));
        }
        u32::try_from(n)
            .map_err(|_| Error::ImportError(format!("顶点数 {} 超出 u32 范围", n)))
    }

    /// 记录一条错误记录；严格模式下直接返回错误
    fn reject(&self, err: Error, stats: &mut ImportStats) -> Result<()> {
        if self.strict {
            return Err(err);
        }
        warn!("跳过记录: {}", err);
        stats.errors += 1;
        Ok(())
    }

    fn progress(&self, line: usize) {
        if line % self.batch_size == 0 {
            debug!(lines = line, "导入进度");
        }
    }

    fn finish(
        &self,
        pairs: Vec<(u32, u32)>,
        mut stats: ImportStats,
        start: Instant,
    ) -> Result<(Graph, ImportStats)> {
        let n = self.vertex_count.unwrap_or_else(|| {
            pairs
                .iter()
                .map(|&(u, v)| u.max(v) as usize)
                .max()
                .unwrap_or(0)
        });

        let graph = Graph::from_edges(n, &pairs)?;
        stats.vertices_imported = graph.vertex_count();
        stats.edges_imported = graph.edge_count();
        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok((graph, stats))
    }
}

/// 从 CSV 边表导入
pub fn import_csv<P: AsRef<Path>>(path: P) -> Result<(Graph, ImportStats)> {
    EdgeListImporter::new().import_csv(path)
}

/// 从 JSON Lines 边表导入
pub fn import_jsonl<P: AsRef<Path>>(path: P) -> Result<(Graph, ImportStats)> {
    EdgeListImporter::new().import_jsonl(path)
}
