// reset; cargo run -- --client-file ./data/cliente.xlsx --output-file ./data/salida.xlsx --year 2024 --month 1
// reset; cargo run -- --client-file ./data/cliente.xlsx --output-file ./data/salida.xlsx --year 2024 --month 1 --sheet-pair 3:2 --output-title-range A:F --output-current-column D

use clap::{Parser, ValueEnum};
use reconciler_lib::{ComparatorBuilder, DetectionConfig, ERRORS_LOG_FILE, Report, RunConfig};
use serde::Serialize;
use std::path::Path;

#[derive(Parser)]
#[command(name = "statement-reconciler")]
#[command(about = "A tool to reconcile a client financial statement against its output workbook")]
#[command(version)]
struct Args {
    /// Path to the client workbook (amounts in full currency units)
    #[arg(short, long)]
    client_file: String,

    /// Path to the output workbook (amounts divided by 1000 before comparison)
    #[arg(short, long)]
    output_file: String,

    /// Year of the period to reconcile
    #[arg(short, long)]
    year: i32,

    /// Month of the period to reconcile (1-12)
    #[arg(short, long)]
    month: u32,

    /// Sheet pair to compare as CLIENT:OUTPUT, counting sheets from 1. Repeat for several pairs.
    /// Defaults to 3:2, 4:3 and 5:4.
    #[arg(long = "sheet-pair", value_parser = parse_sheet_pair)]
    sheet_pairs: Vec<(usize, usize)>,

    /// Fixed title range of the output workbook (e.g. A:F). Skips detection on the output side.
    #[arg(long, requires = "output_current_column")]
    output_title_range: Option<String>,

    /// Fixed current-period column of the output workbook (e.g. D). The prior period is the next column.
    #[arg(long, requires = "output_title_range")]
    output_current_column: Option<String>,

    /// How to print the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    config: &'a RunConfig,
    has_findings: bool,
    report: &'a Report,
    rendered: String,
}

/// Parse "3:2" into zero-based (client, output) sheet indices.
fn parse_sheet_pair(value: &str) -> Result<(usize, usize), String> {
    let Some((client, output)) = value.split_once(':') else {
        return Err(format!("'{value}' is not a CLIENT:OUTPUT sheet pair, e.g. 3:2"));
    };

    let sheet_number = |part: &str| -> Result<usize, String> {
        match part.trim().parse::<usize>() {
            Ok(0) => Err(format!("sheet numbers start at 1, got 0 in '{value}'")),
            Ok(number) => Ok(number - 1),
            Err(_) => Err(format!("'{part}' is not a sheet number in '{value}'")),
        }
    };

    Ok((sheet_number(client)?, sheet_number(output)?))
}

fn main() -> anyhow::Result<()> {
    let arguments = Args::parse();

    for (role, file) in [("client", &arguments.client_file), ("output", &arguments.output_file)] {
        if !Path::new(file).is_file() {
            eprintln!("❌ The {role} file was not found: {file}");
            std::process::exit(2);
        }
    }

    let mut builder = ComparatorBuilder::new(
        &arguments.client_file,
        &arguments.output_file,
        arguments.year,
        arguments.month,
    );
    if !arguments.sheet_pairs.is_empty() {
        builder = builder.sheet_map(arguments.sheet_pairs.clone());
    }
    if let (Some(title_range), Some(current_column)) = (
        arguments.output_title_range.as_deref(),
        arguments.output_current_column.as_deref(),
    ) {
        builder = builder.output_config(DetectionConfig::from_letters(title_range, current_column)?);
    }
    let comparator = builder.build()?;

    let report = comparator.run();
    match arguments.format {
        OutputFormat::Text => println!("{}", report.render()),
        OutputFormat::Json => {
            let output = JsonOutput {
                config: comparator.config(),
                has_findings: report.has_findings(),
                report: &report,
                rendered: report.render(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if report.has_findings() {
        eprintln!("❌ Reconciliation found {} issue(s)", report.findings().count());
        eprintln!("❌ Check {} for warnings and sheet errors.", ERRORS_LOG_FILE);
        std::process::exit(1);
    }

    eprintln!("✅ Reconciliation completed!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_sheet_pair() {
        assert_eq!(parse_sheet_pair("3:2"), Ok((2, 1)));
        assert_eq!(parse_sheet_pair(" 1 : 1 "), Ok((0, 0)));
        assert!(parse_sheet_pair("3").is_err());
        assert!(parse_sheet_pair("0:1").is_err());
        assert!(parse_sheet_pair("a:b").is_err());
        assert!(parse_sheet_pair("1:2:3").is_err());
    }

    #[test]
    fn test_arguments() {
        let args = Args::try_parse_from([
            "statement-reconciler",
            "--client-file",
            "client.xlsx",
            "--output-file",
            "output.xlsx",
            "--year",
            "2024",
            "--month",
            "1",
            "--sheet-pair",
            "3:2",
            "--sheet-pair",
            "4:3",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.sheet_pairs, vec![(2, 1), (3, 2)]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.output_title_range, None);
    }

    #[test]
    fn test_fixed_output_layout_needs_both_flags() {
        let result = Args::try_parse_from([
            "statement-reconciler",
            "--client-file",
            "client.xlsx",
            "--output-file",
            "output.xlsx",
            "--year",
            "2024",
            "--month",
            "1",
            "--output-title-range",
            "A:F",
        ]);
        assert!(result.is_err());
    }
}
