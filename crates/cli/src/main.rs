//! Lead scorer command-line entry point
//!
//! Reads a learner profile plus error events (or session summaries) as JSON,
//! runs the scoring pipeline against in-memory stores and prints the
//! resulting records as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

use fluency_leads_config::{load_settings, Settings};
use fluency_leads_core::{
    ConversionCandidate, DynamicOffer, ErrorEvent, ErrorPattern, LeadScore, SessionSummary,
    UserProfile,
};
use fluency_leads_engine::LeadScoringEngine;
use fluency_leads_persistence::PersistenceLayer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings environment (loads config/{env}.yaml)
    #[arg(long, env = "FLUENCY_LEADS_ENV")]
    env: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a learner from their error events
    Score {
        /// JSON file with `profile` and `events`
        #[arg(long)]
        input: PathBuf,
    },
    /// Check whether a free learner is a conversion candidate
    Conversion {
        /// JSON file with `profile` and `sessions`
        #[arg(long)]
        input: PathBuf,
    },
    /// Load and validate the scoring rules and offer catalog
    CheckConfig,
}

#[derive(Deserialize)]
struct ScoreInput {
    profile: UserProfile,
    #[serde(default)]
    events: Vec<ErrorEvent>,
}

#[derive(Serialize)]
struct ScoreOutput {
    patterns: Vec<ErrorPattern>,
    lead_score: LeadScore,
    offer: Option<DynamicOffer>,
}

#[derive(Deserialize)]
struct ConversionInput {
    profile: UserProfile,
    #[serde(default)]
    sessions: Vec<SessionSummary>,
}

#[derive(Serialize)]
struct ConversionOutput {
    user_id: String,
    candidate: Option<ConversionCandidate>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let settings = match load_settings(args.env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load settings: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&settings);
    tracing::debug!(
        environment = ?settings.environment,
        env = args.env.as_deref().unwrap_or("default"),
        "Settings loaded"
    );

    let engine = build_engine(&settings)?;

    match args.command {
        Command::Score { input } => {
            let input: ScoreInput = read_json(&input)?;
            print_json(&score(&engine, input)?)
        }
        Command::Conversion { input } => {
            let input: ConversionInput = read_json(&input)?;
            let candidate = engine.detect_conversion_candidate(&input.profile, &input.sessions);
            print_json(&ConversionOutput {
                user_id: input.profile.user_id,
                candidate,
            })
        }
        Command::CheckConfig => {
            tracing::info!(
                modules = engine.catalog().modules.len(),
                domains = engine.catalog().domain_offers.len(),
                "Configuration is valid"
            );
            Ok(())
        }
    }
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(&settings.observability.log_level)
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}

fn build_engine(settings: &Settings) -> Result<LeadScoringEngine> {
    let scoring = settings
        .scoring_config()
        .context("Failed to load scoring config")?;
    let catalog = settings
        .offer_catalog()
        .context("Failed to load offer catalog")?;
    let stores = PersistenceLayer::in_memory();

    Ok(LeadScoringEngine::new(
        scoring,
        catalog,
        stores.lead_scores,
        stores.offers,
        stores.error_history,
    ))
}

fn score(engine: &LeadScoringEngine, input: ScoreInput) -> Result<ScoreOutput> {
    let profile = input.profile;
    let patterns = engine.analyze_error_patterns(&profile.user_id, &input.events);

    let (matched, offer) = engine.check_potential_lead_criteria(&profile, &patterns)?;
    let lead_score = if matched {
        // The gate has already scored and stored the profile
        match engine.stored_lead_score(&profile.user_id)? {
            Some(score) => score,
            None => engine.calculate_lead_score(&profile, &patterns)?,
        }
    } else {
        engine.calculate_lead_score(&profile, &patterns)?
    };

    Ok(ScoreOutput {
        patterns,
        lead_score,
        offer,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid input in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
