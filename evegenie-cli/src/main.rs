use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anstream::{eprintln, print, println};
use evegenie_core::{DebugVerbosity, EveGenie, GenieConfig, GenieError, SettingsConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "trace")]
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    run_cli()
}

/// Options gathered from the command line.
#[derive(Debug, Default)]
struct CliOptions {
    input_file: Option<String>,
    config: GenieConfig,
    settings: SettingsConfig,
    to_stdout: bool,
    show_help: bool,
}

fn parse_args(args: &[String]) -> Result<CliOptions, Box<dyn std::error::Error>> {
    let mut options = CliOptions::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                options.show_help = true;
            }
            "--debug" => {
                options.config.debug = true;
            }
            "--verbose" => {
                options.config.debug = true;
                options.config.verbosity = DebugVerbosity::Verbose;
            }
            "--stdout" => {
                options.to_stdout = true;
            }
            "--max-depth" => {
                let value = next_value(args, &mut i, "--max-depth")?;
                options.config.max_depth = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid value for --max-depth: {}", value))?;
            }
            "--settings-config" => {
                let path = next_value(args, &mut i, "--settings-config")?;
                options.settings = load_settings_config(Path::new(&path))?;
            }
            "--mongo-host" => {
                options.settings.mongo_host = next_value(args, &mut i, "--mongo-host")?;
            }
            "--mongo-dbname" => {
                options.settings.mongo_dbname = next_value(args, &mut i, "--mongo-dbname")?;
            }
            _ => {
                if !args[i].starts_with('-') && options.input_file.is_none() {
                    options.input_file = Some(args[i].clone());
                }
            }
        }
        i += 1;
    }

    Ok(options)
}

fn next_value(
    args: &[String],
    i: &mut usize,
    flag: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if *i + 1 < args.len() {
        *i += 1;
        Ok(args[*i].clone())
    } else {
        Err(format!("Missing value for {}", flag).into())
    }
}

/// Read settings boilerplate from a JSON file; omitted keys keep their defaults.
fn load_settings_config(path: &Path) -> Result<SettingsConfig, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read settings config {}: {}", path.display(), e))?;
    let config = serde_json::from_str(&text)
        .map_err(|e| format!("Invalid settings config {}: {}", path.display(), e))?;
    Ok(config)
}

/// Output path for an input file: the file name cut at its first `.`, plus
/// `.settings.py`, in the same directory.
fn settings_path(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    input.with_file_name(format!("{}.settings.py", stem))
}

// Extract the main logic into a separate function so we can call it from tests
fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args)?;

    if options.show_help {
        print_help();
        return Ok(());
    }

    let Some(filename) = options.input_file else {
        print_help();
        return Ok(());
    };

    let input = Path::new(&filename);
    if !input.is_file() {
        eprintln!("file does not exist");
        return Ok(());
    }

    if !options.to_stdout {
        println!("converting contents of {}", filename);
    }
    let genie = EveGenie::builder()
        .filename(input)
        .config(options.config)
        .build()
        .map_err(|e| match e {
            GenieError::Json(err) => format!("Invalid JSON input: {}", err),
            other => format!("Schema inference failed: {}", other),
        })?;

    let settings = genie.render_settings(&options.settings);
    if options.to_stdout {
        print!("{}", settings);
    } else {
        let outfile = settings_path(input);
        fs::write(&outfile, settings)?;
        println!("settings file written to {}", outfile.display());
    }

    Ok(())
}

fn print_help() {
    println!("evegenie-cli - Eve schema and settings generator");
    println!();
    println!("USAGE:");
    println!("    evegenie-cli [OPTIONS] <FILE>");
    println!();
    println!("ARGS:");
    println!("    <FILE>    JSON file mapping each endpoint name to an example document");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help              Print this help message");
    println!("    --debug                 Print inference decisions to stderr");
    println!("    --verbose               Print every field as it is classified (implies --debug)");
    println!("    --max-depth <N>         Reject documents nested deeper than N (default 128)");
    println!("    --settings-config <F>   JSON file with mongo_host, mongo_dbname, resource_methods,");
    println!("                            bandwidth_saver (flags given after it take precedence)");
    println!("    --mongo-host <HOST>     MONGO_HOST written to the settings (default localhost)");
    println!("    --mongo-dbname <NAME>   MONGO_DBNAME written to the settings (default testing)");
    println!("    --stdout                Print the settings module instead of writing it");
    println!();
    println!("Writes <name>.settings.py next to FILE, where <name> is FILE's name up to its first '.'");
    println!();
    println!("EXAMPLES:");
    println!("    evegenie-cli heroes.json");
    println!("    evegenie-cli --mongo-dbname heroes --stdout heroes.json");
}
