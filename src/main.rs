//! correction-engine CLI
//!
//! Run correction and interest calculations from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Standard or legislative calculation (mode is read from the request)
//! correction-engine calculate --request claim.json --indices indices.json
//!
//! # Output as JSON
//! correction-engine calculate --request claim.json --indices indices.json --format json
//!
//! # Legislative calculation under a custom regime schedule
//! correction-engine calculate --request claim.json --indices indices.json --config regimes.json
//!
//! # Generate a synthetic index series for testing
//! correction-engine generate --name IPCA_E --from 2000-01 --to 2025-12
//! ```

use correction_engine::calculation::legislative::LegislativeCalculator;
use correction_engine::calculation::regime::LegislativeConfig;
use correction_engine::calculation::run_standard;
use correction_engine::core::competence::Competence;
use correction_engine::core::request::{
    CalculationMode, CalculationRequest, Installment, InterestKind, Periodicity,
};
use correction_engine::core::series::{IndexSeries, Provenance, SeriesId, SeriesSource};
use correction_engine::simulation::synthetic::{generate_series, SyntheticSeriesConfig};
use correction_engine::store::memory::InMemoryIndexStore;
use correction_engine::store::IndexStore;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"correction-engine: monetary correction and interest for legal claims

USAGE:
    correction-engine <COMMAND> [OPTIONS]

COMMANDS:
    calculate   Correct a claim and accrue interest
    generate    Generate a synthetic monthly index series (for testing)
    help        Show this message

OPTIONS (calculate):
    --request <FILE>    Path to JSON request file
    --indices <FILE>    Path to JSON index file
    --config <FILE>     Legislative regime configuration (default: federal legislation)
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --name <NAME>       Series name (default: SYNTHETIC)
    --from <YYYY-MM>    First month (required)
    --to <YYYY-MM>      Last month (required)
    --base <DECIMAL>    Value of the first month (default: 100)
    --seed <N>          Fixed random seed
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. RUST_LOG=debug

EXAMPLES:
    correction-engine calculate --request claim.json --indices indices.json
    correction-engine calculate --request claim.json --indices indices.json --format json
    correction-engine generate --name IPCA_E --from 1990-01 --to 2025-12 --output ipca.json"#
    );
}

/// JSON schema for index files.
#[derive(serde::Deserialize, serde::Serialize)]
struct IndicesFile {
    series: Vec<SeriesInput>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct SeriesInput {
    name: String,
    #[serde(default)]
    source: SeriesSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    official_code: Option<String>,
    points: Vec<PointInput>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct PointInput {
    competence: Competence,
    value: Decimal,
}

/// JSON schema for requests. Series are referenced by name.
#[derive(serde::Deserialize)]
struct RequestInput {
    principal: Decimal,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default)]
    index: Option<String>,
    #[serde(default)]
    interest_kind: InterestKind,
    #[serde(default)]
    interest_rate: Decimal,
    #[serde(default)]
    periodicity: Periodicity,
    #[serde(default)]
    penalty_percent: Decimal,
    #[serde(default)]
    fee_percent: Decimal,
    #[serde(default = "default_true")]
    interest_on_corrected: bool,
    #[serde(default)]
    installments: Vec<InstallmentInput>,
    #[serde(default)]
    mode: CalculationMode,
}

fn default_true() -> bool {
    true
}

#[derive(serde::Deserialize)]
struct InstallmentInput {
    #[serde(default)]
    description: String,
    amount: Decimal,
    due_date: NaiveDate,
    #[serde(default)]
    index: Option<String>,
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    })
}

fn load_indices(path: &str) -> InMemoryIndexStore {
    let file: IndicesFile = serde_json::from_str(&read_file(path)).unwrap_or_else(|e| {
        eprintln!("Error parsing index file: {}", e);
        eprintln!("Expected format:");
        eprintln!(r#"{{
  "series": [
    {{ "name": "IPCA_E", "source": "ibge", "points": [ {{ "competence": "2021-11", "value": "100.0" }} ] }}
  ]
}}"#);
        process::exit(1);
    });

    let mut store = InMemoryIndexStore::new();
    for input in file.series {
        let mut series = IndexSeries::new(input.name, input.source);
        if let Some(code) = input.official_code {
            series = series.with_official_code(code);
        }
        for point in input.points {
            series.insert(point.competence, point.value, Provenance::CsvImport);
        }
        let name = series.name().to_string();
        let points = series.len();
        store.add_series(series).unwrap_or_else(|e| {
            eprintln!("Error loading index file: {}", e);
            process::exit(1);
        });
        log::debug!("loaded series {} ({} points)", name, points);
    }
    store
}

fn resolve_series(store: &InMemoryIndexStore, name: &str) -> SeriesId {
    store.resolve_name(name).unwrap_or_else(|| {
        eprintln!("Unknown index series '{}' (not in the index file)", name);
        process::exit(1);
    })
}

fn load_request(path: &str, store: &InMemoryIndexStore) -> CalculationRequest {
    let input: RequestInput = serde_json::from_str(&read_file(path)).unwrap_or_else(|e| {
        eprintln!("Error parsing request file: {}", e);
        eprintln!("Expected format:");
        eprintln!(r#"{{
  "principal": "10000.00",
  "start_date": "2024-01-01",
  "end_date": "2025-01-01",
  "index": "IPCA_E",
  "interest_rate": "1.0",
  "mode": "standard"
}}"#);
        process::exit(1);
    });

    let mut request = CalculationRequest::new(input.principal, input.start_date, input.end_date)
        .with_interest(input.interest_kind, input.interest_rate, input.periodicity)
        .with_penalty(input.penalty_percent)
        .with_fee(input.fee_percent)
        .with_mode(input.mode);
    if !input.interest_on_corrected {
        request = request.with_interest_on_original();
    }
    if let Some(name) = input.index {
        request = request.with_index(resolve_series(store, &name));
    }
    for inst in input.installments {
        let mut installment = Installment::new(inst.description, inst.amount, inst.due_date);
        if let Some(name) = inst.index {
            installment = installment.with_index(resolve_series(store, &name));
        }
        request = request.with_installment(installment);
    }
    request
}

fn load_config(path: Option<&str>) -> LegislativeConfig {
    match path {
        Some(path) => serde_json::from_str(&read_file(path)).unwrap_or_else(|e| {
            eprintln!("Error parsing legislative configuration: {}", e);
            process::exit(1);
        }),
        None => LegislativeConfig::default(),
    }
}

fn cmd_calculate(args: &[String]) {
    let mut request_path = None;
    let mut indices_path = None;
    let mut config_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--request" => {
                i += 1;
                request_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--request requires a file path");
                    process::exit(1);
                }));
            }
            "--indices" => {
                i += 1;
                indices_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--indices requires a file path");
                    process::exit(1);
                }));
            }
            "--config" => {
                i += 1;
                config_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let request_path = request_path.unwrap_or_else(|| {
        eprintln!("Error: --request <FILE> is required");
        process::exit(1);
    });
    let indices_path = indices_path.unwrap_or_else(|| {
        eprintln!("Error: --indices <FILE> is required");
        process::exit(1);
    });

    let store = load_indices(&indices_path);
    let request = load_request(&request_path, &store);

    let outcome = match request.mode {
        CalculationMode::Standard => run_standard(&store, &request),
        CalculationMode::Legislative => {
            LegislativeCalculator::new(load_config(config_path.as_deref())).run(&store, &request)
        }
    };

    let result = outcome.unwrap_or_else(|e| {
        eprintln!("Calculation failed ({:?} error): {}", e.category(), e);
        process::exit(1);
    });

    if format == "json" {
        let json = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
            eprintln!("Error serializing result: {}", e);
            process::exit(1);
        });
        println!("{}", json);
    } else {
        println!("{}", result);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = SyntheticSeriesConfig::default();
    let mut from = None;
    let mut to = None;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                i += 1;
                config.name = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--name requires a series name");
                    process::exit(1);
                });
            }
            "--from" => {
                i += 1;
                from = Some(parse_competence(args.get(i), "--from"));
            }
            "--to" => {
                i += 1;
                to = Some(parse_competence(args.get(i), "--to"));
            }
            "--base" => {
                i += 1;
                config.base = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--base requires a decimal number");
                        process::exit(1);
                    });
            }
            "--seed" => {
                i += 1;
                config.seed = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--seed requires a number");
                    process::exit(1);
                }));
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    config.from = from.unwrap_or_else(|| {
        eprintln!("Error: --from <YYYY-MM> is required");
        process::exit(1);
    });
    config.to = to.unwrap_or_else(|| {
        eprintln!("Error: --to <YYYY-MM> is required");
        process::exit(1);
    });

    let series = generate_series(&config);
    let output = IndicesFile {
        series: vec![SeriesInput {
            name: series.name().to_string(),
            source: series.source(),
            official_code: None,
            points: series
                .points()
                .map(|p| PointInput {
                    competence: p.competence,
                    value: p.value,
                })
                .collect(),
        }],
    };

    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Error serializing series: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} months of {} ({} to {}) → {}",
            series.len(),
            series.name(),
            config.from,
            config.to,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn parse_competence(arg: Option<&String>, flag: &str) -> Competence {
    arg.and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        eprintln!("{} requires a month as YYYY-MM", flag);
        process::exit(1);
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "calculate" => cmd_calculate(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
