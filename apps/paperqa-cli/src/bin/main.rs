use std::collections::BTreeMap;
use std::env;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use paperqa_answer::summary::{summarize_document, MAX_SUMMARIZED_DOCUMENTS};
use paperqa_answer::{answer, Session};
use paperqa_core::config::{expand_path, Config};
use paperqa_core::processor::DocumentProcessor;
use paperqa_core::traits::LanguageModel;
use paperqa_core::types::Chunk;
use paperqa_llm::{ChatClient, EmbeddingClient};
use paperqa_retrieval::{HybridRetriever, RetrievalHealth, RetrievalLimits, Severity};
use paperqa_text::TantivyKeywordIndex;
use paperqa_vector::CosineVectorIndex;

type CliSession = Session<CosineVectorIndex, TantivyKeywordIndex>;

const EMBED_BATCH_SIZE: usize = 32;
const SOURCE_PREVIEW_CHARS: usize = 300;

struct Settings {
    docs_dir: PathBuf,
    keyword_index_dir: PathBuf,
    vector_index_path: PathBuf,
    limits: RetrievalLimits,
    llm_base_url: String,
    llm_model: String,
    embedding_model: String,
    embedding_dim: usize,
    temperature: f32,
    api_key: String,
}

fn load_settings(config: &Config) -> Settings {
    let defaults = RetrievalLimits::default();
    Settings {
        docs_dir: expand_path(
            config.get::<String>("data.docs_dir").unwrap_or_else(|_| "./docs".to_string()),
        ),
        keyword_index_dir: expand_path(
            config
                .get::<String>("data.keyword_index_dir")
                .unwrap_or_else(|_| "./indexes/keyword".to_string()),
        ),
        vector_index_path: expand_path(
            config
                .get::<String>("data.vector_index_path")
                .unwrap_or_else(|_| "./indexes/vectors.json".to_string()),
        ),
        limits: RetrievalLimits {
            vector_k: config.get("retrieval.vector_k").unwrap_or(defaults.vector_k),
            final_budget: config.get("retrieval.final_budget").unwrap_or(defaults.final_budget),
        },
        llm_base_url: config
            .get("llm.base_url")
            .unwrap_or_else(|_| paperqa_llm::DEFAULT_BASE_URL.to_string()),
        llm_model: config
            .get("llm.model")
            .unwrap_or_else(|_| paperqa_llm::DEFAULT_CHAT_MODEL.to_string()),
        embedding_model: config
            .get("llm.embedding_model")
            .unwrap_or_else(|_| "bge-small-zh-v1.5".to_string()),
        embedding_dim: config.get("llm.embedding_dim").unwrap_or(512),
        temperature: config.get("llm.temperature").unwrap_or(paperqa_llm::DEFAULT_TEMPERATURE),
        api_key: config
            .get("llm.api_key")
            .or_else(|_| env::var("DEEPSEEK_API_KEY"))
            .unwrap_or_default(),
    }
}

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        usage(&prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn usage(prog: &str) {
    eprintln!("Usage: {prog} <command> [args...]");
    eprintln!("  ingest [dir]        process documents and build both indexes");
    eprintln!("  ask \"<question>\"    answer one question from the indexed documents");
    eprintln!("  chat                interactive session (:stats :docs :reset :quit)");
    eprintln!("  search \"<query>\"    show raw hybrid retrieval output");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;
    let settings = load_settings(&config);
    let (cmd, args) = parse_args();

    match cmd.as_str() {
        "ingest" => {
            let docs_dir = args.first().map(expand_path).unwrap_or(settings.docs_dir.clone());
            ingest(&settings, &docs_dir)
        }
        "ask" => {
            let question = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: paperqa ask \"<question>\"");
                std::process::exit(1);
            });
            ask(&settings, &question)
        }
        "chat" => chat(&settings),
        "search" => {
            let query = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: paperqa search \"<query>\"");
                std::process::exit(1);
            });
            search(&settings, &query)
        }
        _ => {
            eprintln!("Unknown command: {cmd}");
            usage("paperqa");
            std::process::exit(1);
        }
    }
}

fn embedder(settings: &Settings) -> anyhow::Result<Box<EmbeddingClient>> {
    Ok(Box::new(EmbeddingClient::new(
        &settings.llm_base_url,
        &settings.api_key,
        &settings.embedding_model,
        settings.embedding_dim,
    )?))
}

fn chat_client(settings: &Settings) -> anyhow::Result<ChatClient> {
    Ok(ChatClient::new(&settings.llm_base_url, &settings.api_key, &settings.llm_model)?
        .with_temperature(settings.temperature))
}

fn ingest(settings: &Settings, docs_dir: &PathBuf) -> anyhow::Result<()> {
    println!("Ingesting from {}", docs_dir.display());
    let processor = DocumentProcessor::new();
    let chunks = processor.process_directory(docs_dir)?;
    if chunks.is_empty() {
        println!("No processable documents found.");
        return Ok(());
    }

    let keyword_index = TantivyKeywordIndex::create(&settings.keyword_index_dir)?;
    keyword_index.index_chunks(&chunks)?;

    let mut vector_index = CosineVectorIndex::new(embedder(settings)?);
    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)")
            .unwrap()
            .progress_chars("#>-"),
    );
    for batch in chunks.chunks(EMBED_BATCH_SIZE) {
        vector_index.index_chunks(batch)?;
        pb.inc(batch.len() as u64);
    }
    pb.finish_with_message("embedding complete");
    vector_index.save(&settings.vector_index_path)?;

    let mut per_document: BTreeMap<&str, usize> = BTreeMap::new();
    for chunk in &chunks {
        *per_document.entry(chunk.source_document.as_str()).or_insert(0) += 1;
    }
    println!(
        "✅ Ingest complete: {} chunks from {} documents",
        chunks.len(),
        per_document.len()
    );
    for (name, count) in per_document {
        println!("  {name}: {count} chunks");
    }
    Ok(())
}

fn build_session(settings: &Settings) -> anyhow::Result<CliSession> {
    let mut session = Session::new();
    if settings.vector_index_path.exists() && settings.keyword_index_dir.exists() {
        let keyword_index = TantivyKeywordIndex::open(&settings.keyword_index_dir)?;
        let vector_index =
            CosineVectorIndex::load(&settings.vector_index_path, embedder(settings)?)?;
        for (name, count) in vector_index.source_documents() {
            session.register_document(&name, count);
        }
        session.attach_retriever(HybridRetriever::with_limits(
            vector_index,
            keyword_index,
            settings.limits.clone(),
        ));
    }
    Ok(session)
}

fn ask(settings: &Settings, question: &str) -> anyhow::Result<()> {
    let session = build_session(settings)?;
    let llm = chat_client(settings)?;
    let result = answer(&session, &llm, question)?;

    println!("{}", result.text);
    print_sources(&result.sources);
    print_health(&session);
    Ok(())
}

fn chat(settings: &Settings) -> anyhow::Result<()> {
    let mut session = build_session(settings)?;
    let llm = chat_client(settings)?;

    println!("📚 paperqa chat — ask about your documents (:stats :docs :reset :quit)");
    let stdin = std::io::stdin();
    loop {
        print!("❓ > ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        match line {
            "" => continue,
            ":quit" | ":exit" => break,
            ":stats" => print_stats(&session),
            ":docs" => print_docs(&mut session, &llm),
            ":reset" => {
                session.reset();
                println!("Session cleared. Run `paperqa ingest` and restart chat to reload.");
            }
            question => {
                let result = answer(&session, &llm, question)?;
                println!("{}", result.text);
                print_sources(&result.sources);
                print_health(&session);
            }
        }
    }
    Ok(())
}

fn search(settings: &Settings, query: &str) -> anyhow::Result<()> {
    let session = build_session(settings)?;
    let retriever = match session.require_retriever() {
        Ok(retriever) => retriever,
        Err(err) => {
            println!("{err} (run `paperqa ingest` first)");
            return Ok(());
        }
    };
    let chunks = retriever.retrieve(query, session.history())?;
    println!("🔍 {} chunks for: \"{query}\"", chunks.len());
    print_sources(&chunks);
    print_stats(&session);
    Ok(())
}

fn print_sources(sources: &[Chunk]) {
    if sources.is_empty() {
        return;
    }
    println!("\nSources:");
    for (i, chunk) in sources.iter().enumerate() {
        println!(
            "  {}. {} (page {})",
            i + 1,
            chunk.source_document,
            chunk.page_number + 1
        );
        println!(
            "     {}",
            paperqa_answer::context::preview(&chunk.content, SOURCE_PREVIEW_CHARS)
        );
    }
}

fn print_health(session: &CliSession) {
    if let Some(record) = session.history().latest() {
        let health = RetrievalHealth::assess(&record);
        let marker = match health.severity() {
            Severity::Warning => "⚠️",
            Severity::Error => "❌",
            Severity::Info => "ℹ️",
        };
        println!("\n{marker} {health}");
    }
}

fn print_stats(session: &CliSession) {
    let recent = session.history().recent(10);
    if recent.is_empty() {
        println!("Retrieval history is empty. Ask something first!");
        return;
    }
    println!("📈 Last {} queries:", recent.len());
    for record in &recent {
        println!(
            "  vector={} keyword={} final={}  \"{}\"",
            record.vector_results, record.keyword_results, record.final_results, record.query
        );
    }
    print_health(session);
}

fn print_docs(session: &mut CliSession, llm: &dyn LanguageModel) {
    if session.documents().is_empty() {
        println!("No documents indexed. Run `paperqa ingest` first.");
        return;
    }
    // Summaries are generated lazily on first listing, a few documents only.
    if session.summaries().is_empty() {
        let names: Vec<String> = session
            .documents()
            .keys()
            .take(MAX_SUMMARIZED_DOCUMENTS)
            .cloned()
            .collect();
        let chunks_by_doc: Vec<(String, Vec<Chunk>)> = {
            let Some(retriever) = session.retriever() else { return };
            names
                .iter()
                .map(|name| (name.clone(), retriever.vector_index().chunks_of(name)))
                .collect()
        };
        for (name, chunks) in chunks_by_doc {
            let summary = summarize_document(llm, &chunks);
            session.add_summary(&name, summary);
        }
    }
    println!("📚 Indexed documents:");
    for (name, count) in session.documents() {
        println!("  {name}: {count} chunks");
        if let Some(summary) = session.summaries().get(name) {
            println!("    📝 {summary}");
        }
    }
}
