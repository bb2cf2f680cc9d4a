use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qkv_attention::{report, CrossAttention, PipelineConfig, SoftmaxKind};

/// Attend a sentence in one language over a sentence in another
#[derive(Parser, Debug)]
#[command(name = "qkv-attention", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sentence whose words become the queries (heatmap rows)
    #[arg(long)]
    queries_sentence: Option<String>,

    /// Sentence whose words become the keys and values (heatmap columns)
    #[arg(long)]
    keys_sentence: Option<String>,

    /// Word vectors for the query language (.bin or text)
    #[arg(long)]
    queries_embeddings: Option<PathBuf>,

    /// Word vectors for the key language (.bin or text)
    #[arg(long)]
    keys_embeddings: Option<PathBuf>,

    /// Softmax variant: stable or naive
    #[arg(long)]
    softmax: Option<SoftmaxKind>,

    /// Seed for random word vectors
    #[arg(long)]
    seed: Option<u64>,

    /// Print weights as numbers instead of a heatmap
    #[arg(long)]
    numeric: bool,
}

impl Cli {
    fn into_config(self) -> Result<(PipelineConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        // Flags override the file
        if let Some(sentence) = self.queries_sentence {
            config.queries.sentence = sentence;
        }
        if let Some(sentence) = self.keys_sentence {
            config.keys.sentence = sentence;
        }
        if let Some(path) = self.queries_embeddings {
            config.queries.embeddings = Some(path);
        }
        if let Some(path) = self.keys_embeddings {
            config.keys.embeddings = Some(path);
        }
        if let Some(kind) = self.softmax {
            config.attention.softmax = kind;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        config.validate().context("Invalid configuration")?;
        Ok((config, self.numeric))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (config, numeric) = Cli::parse().into_config()?;
    info!(
        queries = %config.queries.sentence,
        keys = %config.keys.sentence,
        softmax = ?config.attention.softmax,
        "starting attention run"
    );

    let pipeline = CrossAttention::from_config(&config).context("Failed to load word vectors")?;
    let alignment = pipeline
        .align(&config.queries.sentence, &config.keys.sentence)
        .context("Attention failed")?;

    let rendered = if numeric {
        report::render_table(alignment.weights.view(), &alignment.query_words, &alignment.key_words)?
    } else {
        report::render_heatmap(alignment.weights.view(), &alignment.query_words, &alignment.key_words)?
    };

    println!("{}", rendered);
    println!(
        "attention output shape: ({}, {})",
        alignment.output.nrows(),
        alignment.output.ncols()
    );
    Ok(())
}
