//! biokg CLI
//!
//! A command-line interface for cross-format biological entity matching
//! and knowledge-graph assembly.

use anyhow::{Context, Result};
use biokg_core::{Corpus, GroundingPolicy, MatchConfig, ParsedFile};
use biokg_grounding::{GroundingClient, GroundingEnricher};
use biokg_pipeline::{Extractor, MatchOutcome, Pipeline};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// biokg - resolve entities across pathway diagrams and quantitative models
#[derive(Parser)]
#[command(name = "biokg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match entities across the two corpora and assemble the graph
    Match {
        /// Parsed-entity JSON files for the diagram corpus
        #[arg(short, long, required = true, num_args = 1..)]
        diagram: Vec<PathBuf>,

        /// Parsed-entity JSON files for the model corpus
        #[arg(short, long, required = true, num_args = 1..)]
        model: Vec<PathBuf>,

        /// Write the per-pair match report as CSV
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Write the assembled knowledge graph as JSON
        #[arg(short, long)]
        graph: Option<PathBuf>,

        /// Minimum shared-identifier count for a pair to be retained
        #[arg(long, default_value = "1")]
        min_overlap: usize,

        /// Minimum shared-identifier count for clustering (defaults to min-overlap)
        #[arg(long)]
        cluster_min_overlap: Option<usize>,

        /// Skip pair generation for identifier buckets larger than this
        #[arg(long)]
        max_bucket: Option<usize>,

        /// Ground unannotated entities via the grounding service
        #[arg(long)]
        ground: bool,

        /// Ground every entity, not only unannotated ones
        #[arg(long)]
        always_ground: bool,

        /// Discard grounding candidates below this confidence
        #[arg(long, default_value = "0.7")]
        confidence_floor: f32,

        /// Skip provenance-only nodes for unmatched entities
        #[arg(long)]
        skip_unmatched: bool,
    },

    /// Show extracted identifiers for one parsed-entity JSON file
    Extract {
        /// Path to the parsed-entity JSON file
        path: PathBuf,
    },

    /// Probe the grounding service with a label
    Ground {
        /// Free-text label to ground
        label: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Match {
            diagram,
            model,
            report,
            graph,
            min_overlap,
            cluster_min_overlap,
            max_bucket,
            ground,
            always_ground,
            confidence_floor,
            skip_unmatched,
        } => {
            let mut config = MatchConfig::default()
                .with_min_overlap(min_overlap)
                .with_confidence_floor(confidence_floor)
                .with_include_unmatched(!skip_unmatched);
            if let Some(threshold) = cluster_min_overlap {
                config = config.with_cluster_min_overlap(threshold);
            }
            if let Some(cutoff) = max_bucket {
                config = config.with_max_bucket_size(cutoff);
            }
            if always_ground {
                config = config.with_grounding(GroundingPolicy::Always);
            } else if ground {
                config = config.with_grounding(GroundingPolicy::MissingOnly);
            }

            cmd_match(config, diagram, model, report, graph).await?;
        }
        Commands::Extract { path } => {
            cmd_extract(path)?;
        }
        Commands::Ground { label } => {
            cmd_ground(label).await?;
        }
    }

    Ok(())
}

/// Load parsed-entity dumps, forcing each file into its flag's corpus
fn load_corpus(paths: &[PathBuf], corpus: Corpus) -> Result<Vec<ParsedFile>> {
    let mut files = Vec::new();
    for path in paths {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let parsed = ParsedFile::from_json(&content)
            .with_context(|| format!("Failed to parse entity dump: {}", path.display()))?;
        for mut file in parsed {
            file.corpus = corpus;
            files.push(file);
        }
    }
    Ok(files)
}

async fn cmd_match(
    config: MatchConfig,
    diagram: Vec<PathBuf>,
    model: Vec<PathBuf>,
    report_path: Option<PathBuf>,
    graph_path: Option<PathBuf>,
) -> Result<()> {
    let mut files = load_corpus(&diagram, Corpus::Diagram)?;
    files.extend(load_corpus(&model, Corpus::Model)?);

    info!(
        "Loaded {} diagram file(s) and {} model file(s)",
        diagram.len(),
        model.len()
    );

    let pipeline = Pipeline::new(config.clone());
    let mut extracted = pipeline.extract(&files);

    if config.grounding != GroundingPolicy::Disabled {
        let client = GroundingClient::default_local();
        if !client.health().await.unwrap_or(false) {
            // Collaborator failure degrades to zero candidates, not a bail
            warn!(
                "Grounding service not reachable at {}; proceeding without grounding",
                client.base_url()
            );
        }
        let enricher = GroundingEnricher::new(client, &config);
        let enrichment = enricher.enrich(&mut extracted.entities).await?;
        println!(
            "Grounding: {} queried, {} enriched, {} candidates accepted",
            enrichment.entities_queried,
            enrichment.entities_enriched,
            enrichment.candidates_accepted
        );
    }

    let outcome = pipeline.resolve(extracted)?;

    if let Some(path) = &report_path {
        write_report(&outcome, path)?;
        println!("✓ Wrote match report to {}", path.display());
    }

    if let Some(path) = &graph_path {
        let json = outcome.graph.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write graph: {}", path.display()))?;
        println!("✓ Wrote knowledge graph to {}", path.display());
    }

    let summary = &outcome.report.summary;
    println!("\nMatch summary:");
    println!(
        "  • Entities: {} diagram, {} model ({} identifier incidences)",
        summary.diagram_entities, summary.model_entities, summary.identifier_incidences
    );
    println!(
        "  • Match pairs: {} ({} cross-corpus, {} intra-corpus)",
        summary.pairs_total, summary.pairs_cross, summary.pairs_intra
    );
    println!(
        "  • Clusters: {} ({} conflicting), {} entities unclustered",
        summary.clusters, summary.conflicting_clusters, summary.unclustered_entities
    );
    println!(
        "  • Graph: {} nodes, {} edges",
        outcome.graph.node_count(),
        outcome.graph.edge_count()
    );
    if summary.malformed_annotations > 0 {
        println!(
            "  • Malformed annotations dropped: {}",
            summary.malformed_annotations
        );
    }
    if summary.oversized_buckets > 0 {
        println!(
            "  • Oversized identifier buckets skipped: {}",
            summary.oversized_buckets
        );
    }

    Ok(())
}

fn write_report(outcome: &MatchOutcome, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report: {}", path.display()))?;
    outcome
        .report
        .write_csv(file)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

fn cmd_extract(path: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let files = ParsedFile::from_json(&content)
        .with_context(|| format!("Failed to parse entity dump: {}", path.display()))?;

    let extractor = Extractor::new(&MatchConfig::default());

    for file in &files {
        let extracted = extractor.extract_file(file);
        println!(
            "{} ({}, {} entities):",
            file.source_file,
            file.corpus,
            file.entity_count()
        );

        for entity in &extracted.entities {
            let label = entity.label.as_deref().unwrap_or("(unlabeled)");
            println!("  • {} [{}]", entity.local_id, label);
            if entity.identifiers.is_empty() {
                println!("      no identifiers");
            }
            for identifier in entity.identifiers.keys() {
                println!("      {}", identifier);
            }
        }

        if !extracted.malformed.is_empty() {
            println!("  Malformed annotations ({}):", extracted.malformed.len());
            for malformed in &extracted.malformed {
                println!(
                    "    - {}#{}: `{}` ({})",
                    malformed.source_file, malformed.local_id, malformed.raw, malformed.reason
                );
            }
        }
        println!();
    }

    Ok(())
}

async fn cmd_ground(label: String) -> Result<()> {
    let client = GroundingClient::default_local();

    if !client.health().await.unwrap_or(false) {
        eprintln!("Error: grounding service is not reachable.");
        eprintln!("  Grounding: {}", client.base_url());
        anyhow::bail!("Grounding service unavailable");
    }

    let candidates = client.ground(&label).await?;

    if candidates.is_empty() {
        println!("No candidates for `{}`.", label);
        return Ok(());
    }

    println!("Candidates for `{}`:", label);
    for candidate in candidates {
        println!(
            "  • {}:{} (confidence {:.2})",
            candidate.namespace.to_lowercase(),
            candidate.accession,
            candidate.confidence
        );
    }

    Ok(())
}
