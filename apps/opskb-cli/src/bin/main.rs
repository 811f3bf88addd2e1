use std::env;
use std::path::PathBuf;

use opskb_core::config::Config;
use opskb_core::loader::{write_records, CorpusLoader};
use opskb_core::SearchResult;
use opskb_search::session::{label_records, State};
use opskb_search::KnowledgeBase;
use opskb_text::Classifier;

const USAGE: &str = "Usage: opskb <search|show|classify|label> [args...]
  search <query> [--limit N] [--min-score X] [--explain]
  show <id>
  classify <problem> [description]
  label <input.json> [output.json]";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{}", USAGE); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("opskb=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[derive(Debug)]
struct SearchArgs {
    query: String,
    limit: Option<usize>,
    min_score: Option<f64>,
    explain: bool,
}

fn flag_value<T: std::str::FromStr>(args: &[String], i: usize) -> Result<T, String> {
    let flag = &args[i];
    let raw = args.get(i + 1).ok_or_else(|| format!("{} requires a value", flag))?;
    raw.parse().map_err(|_| format!("Invalid value for {}: {}", flag, raw))
}

/// Err carries a usage message; the caller exits with status 2.
fn parse_search_args(args: &[String]) -> Result<SearchArgs, String> {
    let mut parsed = SearchArgs { query: String::new(), limit: None, min_score: None, explain: false };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => { parsed.limit = Some(flag_value(args, i)?); i += 2; continue; }
            "--min-score" => { parsed.min_score = Some(flag_value(args, i)?); i += 2; continue; }
            "--explain" => { parsed.explain = true; i += 1; continue; }
            s if s.starts_with("--") => return Err(format!("Unknown flag: {}", s)),
            s => {
                if !parsed.query.is_empty() { parsed.query.push(' '); }
                parsed.query.push_str(s);
                i += 1;
            }
        }
    }
    parsed.query = parsed.query.trim().to_string();
    Ok(parsed)
}

fn print_hit(rank: usize, hit: &SearchResult) {
    println!("\n{:>2}. [{}] {}  score={:.3}  id={}", rank, hit.category, hit.question, hit.score, hit.id);
    println!("    {}", hit.highlight.replace('\n', " "));
}

/// Reports an unavailable knowledge base; search stays disabled but the process exits cleanly.
fn report_unavailable(kb: &KnowledgeBase) -> bool {
    if let State::Unavailable { path, reason } = kb.state() {
        println!("知识库数据不可用 ({}): {}", path.display(), reason);
        println!("搜索已禁用。");
        return true;
    }
    false
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let (cmd, args) = parse_args();
    tracing::debug!(command = %cmd, segmenter = ?settings.text.segmenter, "dispatch");
    match cmd.as_str() {
        "search" => {
            let sa = parse_search_args(&args).unwrap_or_else(|msg| { eprintln!("{}", msg); std::process::exit(2) });
            if sa.query.is_empty() { eprintln!("请输入搜索内容"); return Ok(()); }
            let kb = KnowledgeBase::open(&settings);
            if report_unavailable(&kb) { return Ok(()); }
            let top_k = sa.limit.unwrap_or(settings.search.ui_top_k);
            let min_score = sa.min_score.unwrap_or(settings.search.min_score);
            let hits = kb.search_with(&sa.query, top_k, min_score)?;
            if hits.is_empty() { println!("未找到相关结果"); return Ok(()); }
            let engine = kb.engine()?;
            println!("找到 {} 条相关结果 (共 {} 条记录, 分词: {})", hits.len(), kb.len(), engine.normalizer().segmenter_name());
            for (i, hit) in hits.iter().enumerate() {
                print_hit(i + 1, hit);
                if sa.explain {
                    for (rule, score) in engine.explain(&sa.query, &hit.id).unwrap_or_default() {
                        println!("      {:<18} {:+.3}", rule, score);
                    }
                }
            }
        }
        "show" => {
            let id = args.first().cloned().unwrap_or_else(|| { eprintln!("Usage: opskb show <id>"); std::process::exit(1) });
            let kb = KnowledgeBase::open(&settings);
            if report_unavailable(&kb) { return Ok(()); }
            let record = kb.get(&id)?;
            println!("{}\n", record.question);
            println!("分类: {}", record.category_or_default());
            if !record.keywords.is_empty() { println!("关键词: {}", record.keywords); }
            if !record.source.is_empty() { println!("来源: {}", record.source); }
            println!("\n{}", record.answer);
        }
        "classify" => {
            let problem = args.first().cloned().unwrap_or_else(|| { eprintln!("Usage: opskb classify <problem> [description]"); std::process::exit(1) });
            let description = args.get(1).cloned().unwrap_or_default();
            println!("{}", Classifier::new().classify(&problem, &description));
        }
        "label" => {
            let input = args.first().map(PathBuf::from).unwrap_or_else(|| { eprintln!("Usage: opskb label <input.json> [output.json]"); std::process::exit(1) });
            let report = CorpusLoader::new().load(&input)?;
            let missing = report.records.iter().filter(|r| r.category.is_none()).count();
            let records = label_records(report.records, true);
            match args.get(1) {
                Some(output) => {
                    write_records(&PathBuf::from(output), &records)?;
                    eprintln!("Labeled {} of {} records -> {}", missing, records.len(), output);
                }
                None => println!("{}", serde_json::to_string_pretty(&records)?),
            }
        }
        _ => { eprintln!("Unknown command: {}\n{}", cmd, USAGE); std::process::exit(1); }
    }
    Ok(())
}
