use deepvisual::render::{
    AnchorTable, CircularLayout, ClusterAssignment, DrawPlan, HeadlessError, layout_tiers,
    link_doublet,
};
use deepvisual::{DeepVisualConfig, Diagnostic, LINK_DOUBLET_KEY, Table, resolve_tiers};
use serde::Serialize;
use serde_json::json;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    DeepVisual(deepvisual::Error),
    Pipeline(HeadlessError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::DeepVisual(err) => write!(f, "{err}"),
            CliError::Pipeline(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<deepvisual::Error> for CliError {
    fn from(value: deepvisual::Error) -> Self {
        Self::DeepVisual(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Pipeline(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    Classify,
    Layout,
    #[default]
    Plan,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    cluster: bool,
    no_labels: bool,
    syntax: Option<String>,
    radius: Option<f64>,
    pretty: bool,
    verbose: bool,
    out: Option<String>,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    layout: &'a CircularLayout,
    anchors: &'a AnchorTable,
    diagnostics: Vec<&'a Diagnostic>,
}

#[derive(Serialize)]
struct PlanOut<'a> {
    plan: &'a DrawPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    clusters: Option<&'a ClusterAssignment>,
    diagnostics: &'a [Diagnostic],
}

fn usage() -> &'static str {
    "deepvisual-cli\n\
\n\
USAGE:\n\
  deepvisual-cli [plan] [--config <path>] [--cluster] [--no-labels] [--radius <r>] [--syntax explicit|positional] [--pretty] [--verbose] [--out <path>] [<path>|-]\n\
  deepvisual-cli classify [--config <path>] [--syntax explicit|positional] [--pretty] [--verbose] [--out <path>] [<path>|-]\n\
  deepvisual-cli layout [--config <path>] [--radius <r>] [--syntax explicit|positional] [--pretty] [--verbose] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the relation table is read from stdin.\n\
  - The table is a JSON array of rows: {\"from\": .., \"to\": ..} objects or [from, to] pairs.\n\
  - References to other rows are written #<row> (1-based); --syntax positional treats bare\n\
    integers as references, as older tables do.\n\
  - --config reads JSON, or YAML when the file ends in .yaml/.yml; options live under\n\
    \"linkDoublet\". Command-line flags override the file.\n\
  - Skipped rows are reported as warnings on stderr and in the JSON output.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "classify" => args.command = Command::Classify,
            "layout" => args.command = Command::Layout,
            "plan" => args.command = Command::Plan,
            "--cluster" => args.cluster = true,
            "--no-labels" => args.no_labels = true,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--syntax" => {
                let Some(syntax) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                match syntax.as_str() {
                    "explicit" | "positional" => args.syntax = Some(syntax.clone()),
                    _ => return Err(CliError::Usage(usage())),
                }
            }
            "--radius" => {
                let Some(r) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.radius = Some(r.parse::<f64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_config(args: &Args) -> Result<DeepVisualConfig, CliError> {
    let mut config = match args.config.as_deref() {
        None => DeepVisualConfig::empty_object(),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let is_yaml = Path::new(path)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
            if is_yaml {
                DeepVisualConfig::from_yaml_str(&text)?
            } else {
                DeepVisualConfig::from_json_str(&text)?
            }
        }
    };

    if args.cluster {
        config.set_value(&format!("{LINK_DOUBLET_KEY}.cluster"), json!(true));
    }
    if args.no_labels {
        config.set_value(&format!("{LINK_DOUBLET_KEY}.showLabels"), json!(false));
    }
    if let Some(syntax) = args.syntax.as_deref() {
        config.set_value(&format!("{LINK_DOUBLET_KEY}.referenceSyntax"), json!(syntax));
    }
    if let Some(radius) = args.radius {
        config.set_value(&format!("{LINK_DOUBLET_KEY}.radius"), json!(radius));
    }
    Ok(config)
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let options = config.link_doublet_options()?;
    let text = read_input(args.input.as_deref())?;
    let table = Table::from_json_str(&text)?;
    tracing::debug!(rows = table.len(), command = ?args.command, "table loaded");

    match args.command {
        Command::Classify => {
            let tiers = resolve_tiers(&table, options.reference_syntax);
            write_json(&tiers, args.pretty, args.out.as_deref())
        }
        Command::Layout => {
            let tiers = resolve_tiers(&table, options.reference_syntax);
            let (layout, anchors) = layout_tiers(&tiers, &options)?;
            let out = LayoutOut {
                layout: &layout,
                anchors: &anchors,
                diagnostics: tiers
                    .diagnostics
                    .iter()
                    .chain(anchors.diagnostics.iter())
                    .collect(),
            };
            write_json(&out, args.pretty, args.out.as_deref())
        }
        Command::Plan => {
            let diagram = link_doublet(&table, &options)?;
            let out = PlanOut {
                plan: &diagram.plan,
                clusters: diagram.clusters.as_ref(),
                diagnostics: &diagram.diagnostics,
            };
            write_json(&out, args.pretty, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
