//! blossom-match 命令行工具
//!
//! 从 CSV 或 JSON Lines 边表读入图，计算最大基数匹配

use anyhow::{bail, Context};
use blossom_matching::import::DEFAULT_MAX_VERTICES;
use blossom_matching::{EdgeListImporter, EdmondsBlossom};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "blossom-match")]
#[command(about = "一般图最大基数匹配（Edmonds 带花树算法）")]
struct Args {
    /// 输入文件路径
    #[arg(short, long)]
    input: PathBuf,

    /// 输入格式: csv, jsonl
    #[arg(short, long, default_value = "csv")]
    format: String,

    /// 顶点数（默认取边表中的最大编号）
    #[arg(short = 'n', long)]
    vertices: Option<usize>,

    /// 顶点数上限
    #[arg(long, default_value_t = DEFAULT_MAX_VERTICES)]
    max_vertices: usize,

    /// 批次大小（每处理一批记录输出一次进度日志）
    #[arg(short, long, default_value = "10000")]
    batch_size: usize,

    /// 不使用贪心初始匹配
    #[arg(long)]
    no_greedy: bool,

    /// 以 JSON 输出结果
    #[arg(long)]
    json: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut importer = EdgeListImporter::new()
        .with_max_vertices(args.max_vertices)
        .with_batch_size(args.batch_size);
    if let Some(n) = args.vertices {
        importer = importer.with_vertex_count(n);
    }

    let (graph, stats) = match args.format.as_str() {
        "csv" => importer.import_csv(&args.input),
        "jsonl" | "json" => importer.import_jsonl(&args.input),
        other => bail!("不支持的格式: {}", other),
    }
    .with_context(|| format!("导入失败: {:?}", args.input))?;

    let graph = Arc::new(graph);
    let result = EdmondsBlossom::new(graph.clone())
        .with_greedy_init(!args.no_greedy)
        .max_matching();

    if args.json {
        println!("{}", result.to_json(&graph)?);
        return Ok(());
    }

    println!("blossom-match 最大匹配");
    println!("========================");
    println!("输入文件: {:?}", args.input);
    println!("  顶点数: {}", stats.vertices_imported);
    println!("  边数: {}", stats.edges_imported);
    println!("  跳过记录: {}", stats.errors);
    println!("  导入耗时: {} ms", stats.duration_ms);
    println!("\n匹配结果:");
    println!("  匹配大小: {}", result.size);
    println!("  初始匹配: {}", result.stats.initial_size);
    println!("  搜索阶段: {}", result.stats.phases);
    println!("  增广次数: {}", result.stats.augmentations);
    println!("  花收缩: {}", result.stats.blossoms);
    println!("  耗时: {} ms", result.stats.duration_ms);
    println!("\n匹配边:");
    for (u, v) in result.pairs(&graph) {
        println!("  {} - {}", u, v);
    }

    Ok(())
}
