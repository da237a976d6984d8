// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Eurocode 2 minimum-requirement check of the beams in an IFC model
//!
//! Usage:
//!   ifc-beam-check <model.ifc> [options]

use anyhow::{bail, Context, Result};
use ifc_beam_check::{check_model, default_output_path, export_csv, CheckConfig, Summary};
use ifc_beam_core::IfcModel;
use std::env;
use std::path::PathBuf;

#[derive(Debug, PartialEq)]
struct Options {
    model_path: PathBuf,
    output_path: Option<PathBuf>,
    min_width_mm: Option<f64>,
    config_path: Option<PathBuf>,
    summary_only: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,ifc_beam_check=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<()> {
    let mut config = match &options.config_path {
        Some(path) => CheckConfig::from_json_file(path)?,
        None => CheckConfig::default(),
    }
    .with_env()?;
    if let Some(min_width_mm) = options.min_width_mm {
        config.min_width_mm = min_width_mm;
    }
    config.validate()?;

    let model = IfcModel::open(&options.model_path)
        .with_context(|| format!("Cannot load model '{}'", options.model_path.display()))?;
    tracing::info!(
        path = %options.model_path.display(),
        schema = model.schema().unwrap_or("unknown"),
        entities = model.entity_count(),
        "Loaded model"
    );

    let records = check_model(&model, &config);

    let output_path = options
        .output_path
        .clone()
        .unwrap_or_else(|| default_output_path(&options.model_path));
    export_csv(&output_path, &records)
        .with_context(|| format!("Cannot write '{}'", output_path.display()))?;

    if !options.summary_only {
        for record in &records {
            let section = match (record.width_mm, record.height_mm) {
                (Some(w), Some(h)) => format!("{:.0}x{:.0} mm", w, h),
                _ => "-".to_string(),
            };
            println!(
                "{:<24} {:>14}  {:<12} {}",
                record.global_id, section, record.compliance, record.provenance
            );
        }
        println!();
    }

    let summary = Summary::from_records(&records);
    println!("Beams:         {}", summary.total);
    println!("Compliant:     {}", summary.compliant);
    println!("Non-compliant: {}", summary.non_compliant);
    println!("Unknown:       {}", summary.unknown);
    println!("Min width:     {} mm", config.min_width_mm);
    println!("Output:        {}", output_path.display());

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Option<Options>> {
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return Ok(None);
    }

    let mut options = Options {
        model_path: PathBuf::from(&args[1]),
        output_path: None,
        min_width_mm: None,
        config_path: None,
        summary_only: false,
    };

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        let mut value = || {
            rest.next()
                .with_context(|| format!("Missing value for {}", arg))
        };
        match arg.as_str() {
            "--output" | "-o" => options.output_path = Some(PathBuf::from(value()?)),
            "--config" => options.config_path = Some(PathBuf::from(value()?)),
            "--min-width" => {
                let raw = value()?;
                options.min_width_mm = Some(
                    raw.parse()
                        .with_context(|| format!("Invalid min width '{}'", raw))?,
                );
            }
            "--summary-only" => options.summary_only = true,
            other => bail!("Unknown option: {}", other),
        }
    }

    Ok(Some(options))
}

fn print_usage() {
    eprintln!("Usage: ifc-beam-check <model.ifc> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --output, -o <PATH>   Output CSV (default: <model>.beam_check.csv)");
    eprintln!("  --min-width <MM>      Minimum beam width in mm (default: 200)");
    eprintln!("  --config <FILE>       JSON file with check constants");
    eprintln!("  --summary-only        Print only the totals");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  BEAM_CHECK_*          Override config fields, e.g. BEAM_CHECK_FCK_MPA=35");
    eprintln!("  RUST_LOG              Log filter (default: warn,ifc_beam_check=info)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("ifc-beam-check")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_all_options() {
        let options = parse_args(&args(&[
            "m.ifc",
            "--output",
            "out.csv",
            "--min-width",
            "250",
            "--config",
            "c.json",
            "--summary-only",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(
            options,
            Options {
                model_path: PathBuf::from("m.ifc"),
                output_path: Some(PathBuf::from("out.csv")),
                min_width_mm: Some(250.0),
                config_path: Some(PathBuf::from("c.json")),
                summary_only: true,
            }
        );
    }

    #[test]
    fn test_help() {
        assert!(parse_args(&args(&[])).unwrap().is_none());
        assert!(parse_args(&args(&["--help"])).unwrap().is_none());
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_args(&args(&["m.ifc", "--min-width"])).is_err());
        assert!(parse_args(&args(&["m.ifc", "--min-width", "wide"])).is_err());
        assert!(parse_args(&args(&["m.ifc", "--verbose"])).is_err());
    }
}
