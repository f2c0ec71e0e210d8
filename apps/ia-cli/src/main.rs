use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use ia_aggregate::{
    AggContext, MismatchTable, Method, RegionAggregation, RegionComponents, Recursion, Targets,
    TimeAggregation, VariableAggregation,
};
use ia_app::{AppError, AppResult, JobReport, data_service, query, run_service};
use ia_core::{TracingSink, Tolerances};
use ia_hierarchy::ComponentsArg;
use ia_store::{Filter, RecordStore};

#[derive(Parser)]
#[command(name = "iamagg")]
#[command(about = "Aggregate and validate IAM timeseries data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads a data file.
#[derive(Args)]
struct DataArgs {
    /// Path to the records file (JSON lines)
    data_path: PathBuf,
    /// Variable hierarchy delimiter
    #[arg(long, default_value = "|")]
    delimiter: String,
    /// Relative tolerance for checks
    #[arg(long, default_value_t = 1e-5)]
    rtol: f64,
    /// Absolute tolerance for checks
    #[arg(long, default_value_t = 1e-8)]
    atol: f64,
}

/// Where aggregated records go.
#[derive(Args)]
struct OutputArgs {
    /// Merge the result into the input records before writing
    #[arg(long)]
    append: bool,
    /// Output file (JSON lines); defaults to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the size and coverage of a records file
    Summary {
        /// Path to the records file (JSON lines)
        data_path: PathBuf,
    },
    /// Aggregate variables from their components
    Aggregate {
        #[command(flatten)]
        data: DataArgs,
        /// Target variable (repeat for several)
        #[arg(short, long = "variable", required = true)]
        variables: Vec<String>,
        /// Explicit components of a single target
        #[arg(long, num_args = 1..)]
        components: Option<Vec<String>>,
        /// Reduction method: sum or max
        #[arg(long, default_value = "sum")]
        method: String,
        /// Recursive mode: true, false or skip-validate
        #[arg(long, default_value = "false")]
        recursive: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Aggregate subregions into a region
    AggregateRegion {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        region: RegionArgs,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Aggregate over the values of an extra column
    AggregateTime {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        time: TimeArgs,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Check variables against the sum of their components
    Check {
        #[command(flatten)]
        data: DataArgs,
        /// Target variable (repeat for several)
        #[arg(short, long = "variable", required = true)]
        variables: Vec<String>,
        /// Explicit components of a single target
        #[arg(long, num_args = 1..)]
        components: Option<Vec<String>>,
        /// Reduction method: sum or max
        #[arg(long, default_value = "sum")]
        method: String,
        /// Only check these years
        #[arg(long, num_args = 1..)]
        year: Vec<i32>,
        /// Mark failing scenarios as excluded and write the records to this file
        #[arg(long)]
        exclude_on_fail: Option<PathBuf>,
    },
    /// Check regions against the aggregate of their subregions
    CheckRegion {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        region: RegionArgs,
    },
    /// Check every variable against components and subregions
    CheckConsistency {
        #[command(flatten)]
        data: DataArgs,
        /// Count region-level-only variables towards regional totals
        #[arg(long)]
        components: bool,
    },
    /// Run the jobs of a configuration file
    Run {
        /// Path to the records file (JSON lines)
        data_path: PathBuf,
        /// Path to the configuration file (YAML or JSON)
        config_path: PathBuf,
        /// Write the final working store to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RegionArgs {
    /// Target variable (repeat for several)
    #[arg(short, long = "variable", required = true)]
    variables: Vec<String>,
    /// Region to aggregate into
    #[arg(long, default_value = "World")]
    region: String,
    /// Subregions to aggregate (default: inferred from the data)
    #[arg(long, num_args = 1..)]
    subregions: Option<Vec<String>>,
    /// Add region-level-only sub-variables to the aggregate
    #[arg(long, conflicts_with = "components")]
    auto_components: bool,
    /// Explicit region-level components
    #[arg(long, num_args = 1..)]
    components: Option<Vec<String>>,
    /// Reduction method: sum or max
    #[arg(long, default_value = "sum")]
    method: String,
    /// Variable to weight by
    #[arg(long)]
    weight: Option<String>,
    /// Keep rows with negative weights
    #[arg(long, requires = "weight")]
    keep_negative_weights: bool,
}

#[derive(Args)]
struct TimeArgs {
    /// Target variable (repeat for several)
    #[arg(short, long = "variable", required = true)]
    variables: Vec<String>,
    /// Extra column to aggregate over
    #[arg(long, default_value = "subannual")]
    column: String,
    /// Value of the aggregated rows in that column
    #[arg(long, default_value = "year")]
    value: String,
    /// Column values to aggregate (default: all but `value`)
    #[arg(long, num_args = 1..)]
    components: Option<Vec<String>>,
    /// Reduction method: sum or max
    #[arg(long, default_value = "sum")]
    method: String,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut sink = TracingSink;

    match cli.command {
        Commands::Summary { data_path } => cmd_summary(&data_path),
        Commands::Aggregate {
            data,
            variables,
            components,
            method,
            recursive,
            out,
        } => {
            let req = VariableAggregation {
                variable: targets(variables),
                components: components.map(ComponentsArg::List),
                method: method.parse::<Method>()?,
                recursive: recursive.parse::<Recursion>().map_err(AppError::InvalidInput)?,
            };
            let store = data_service::load_records(&data.data_path)?;
            let mut ctx = context(&data, &mut sink)?;
            let output = ia_aggregate::aggregate(&store, &req, &mut ctx)?;
            write_output(store, output, &out)
        }
        Commands::AggregateRegion { data, region, out } => {
            let req = region_request(region)?;
            let store = data_service::load_records(&data.data_path)?;
            let mut ctx = context(&data, &mut sink)?;
            let output = ia_aggregate::aggregate_region(&store, &req, &mut ctx)?;
            write_output(store, output, &out)
        }
        Commands::AggregateTime { data, time, out } => {
            let req = time_request(time)?;
            let store = data_service::load_records(&data.data_path)?;
            let mut ctx = context(&data, &mut sink)?;
            let output = ia_aggregate::aggregate_time(&store, &req, &mut ctx)?;
            write_output(store, output, &out)
        }
        Commands::Check {
            data,
            variables,
            components,
            method,
            year,
            exclude_on_fail,
        } => {
            let req = VariableAggregation::new(targets(variables)).method(method.parse::<Method>()?);
            let req = match components {
                Some(list) => req.components(ComponentsArg::List(list)),
                None => req,
            };
            let filter = if year.is_empty() {
                Filter::new()
            } else {
                Filter::new().year(year)
            };
            let mut store = data_service::load_records(&data.data_path)?;
            let mut ctx = context(&data, &mut sink)?;
            let exclude = exclude_on_fail.is_some();
            let table =
                ia_aggregate::check_aggregate_filtered(&mut store, &filter, &req, exclude, &mut ctx)?;
            print_mismatches(table.as_ref());
            if let Some(path) = exclude_on_fail {
                data_service::save_records(&path, &store)?;
                let excluded = store.meta().excluded().len();
                println!("Excluded scenarios: {excluded} (records written to {})", path.display());
            }
            Ok(())
        }
        Commands::CheckRegion { data, region } => {
            let req = region_request(region)?;
            let store = data_service::load_records(&data.data_path)?;
            let mut ctx = context(&data, &mut sink)?;
            let table = ia_aggregate::check_aggregate_region(&store, &req, &mut ctx)?;
            print_mismatches(table.as_ref());
            Ok(())
        }
        Commands::CheckConsistency { data, components } => {
            let store = data_service::load_records(&data.data_path)?;
            let mut ctx = context(&data, &mut sink)?;
            match ia_aggregate::check_internal_consistency(&store, components, &mut ctx)? {
                Some(report) => {
                    println!("{} inconsistent rows:", report.len());
                    println!("{report}");
                }
                None => println!("✓ Data is internally consistent"),
            }
            Ok(())
        }
        Commands::Run {
            data_path,
            config_path,
            output,
        } => cmd_run(&data_path, &config_path, output.as_deref(), &mut sink),
    }
}

fn targets(mut variables: Vec<String>) -> Targets {
    if variables.len() == 1 {
        Targets::One(variables.remove(0))
    } else {
        Targets::Many(variables)
    }
}

fn context<'a>(data: &DataArgs, sink: &'a mut TracingSink) -> AppResult<AggContext<'a>> {
    let ctx = AggContext::new(sink)
        .with_delimiter(data.delimiter.clone())?
        .with_tolerance(Tolerances {
            abs: data.atol,
            rel: data.rtol,
        });
    Ok(ctx)
}

fn region_request(args: RegionArgs) -> AppResult<RegionAggregation> {
    let components = match (args.auto_components, args.components) {
        (true, _) => RegionComponents::Auto,
        (false, Some(list)) => RegionComponents::Explicit(ComponentsArg::List(list)),
        (false, None) => RegionComponents::None,
    };
    Ok(RegionAggregation {
        variable: targets(args.variables),
        region: args.region,
        subregions: args.subregions,
        components,
        method: args.method.parse()?,
        weight: args.weight,
        drop_negative_weights: args.keep_negative_weights.then_some(false),
    })
}

fn time_request(args: TimeArgs) -> AppResult<TimeAggregation> {
    Ok(TimeAggregation {
        variable: targets(args.variables),
        column: args.column,
        value: args.value,
        components: args.components,
        method: args.method.parse()?,
    })
}

fn write_output(mut store: RecordStore, output: RecordStore, out: &OutputArgs) -> AppResult<()> {
    let result = if out.append {
        ia_aggregate::append_into(&mut store, output)?;
        store
    } else {
        output
    };
    match &out.output {
        Some(path) => {
            data_service::save_records(path, &result)?;
            println!("✓ Wrote {} records to {}", result.len(), path.display());
            Ok(())
        }
        None => data_service::write_records(std::io::stdout().lock(), &result),
    }
}

fn print_mismatches(table: Option<&MismatchTable>) {
    match table {
        Some(table) => {
            println!("{} of {} rows do not match:", table.len(), table.compared);
            println!("{table}");
        }
        None => println!("✓ No inconsistencies found"),
    }
}

fn cmd_summary(data_path: &Path) -> AppResult<()> {
    let store = data_service::load_records(data_path)?;
    let summary = query::summarize(&store);

    println!("Records:   {}", summary.record_count);
    println!("Scenarios: {} ({} excluded)", summary.scenario_count, summary.excluded_count);
    println!("Regions:   {}", summary.regions.join(", "));
    println!("Variables: {}", summary.variables.len());
    for variable in &summary.variables {
        println!("  {variable}");
    }
    match summary.time_range {
        Some((first, last)) => println!("Time:      {first} - {last} ({})", summary.time_domain),
        None => println!("Time:      (empty)"),
    }
    Ok(())
}

fn cmd_run(
    data_path: &Path,
    config_path: &Path,
    output: Option<&Path>,
    sink: &mut TracingSink,
) -> AppResult<()> {
    let config = ia_config::load(config_path)?;
    let store = data_service::load_records(data_path)?;
    println!("Running {} jobs from '{}'", config.jobs.len(), config.name);

    let response = run_service::run_jobs(store, &config, sink)?;
    for outcome in &response.outcomes {
        match &outcome.report {
            JobReport::Aggregated { output, appended } => {
                let verb = if *appended { "appended" } else { "computed" };
                println!("  {}: {} {} records", outcome.id, verb, output.len());
            }
            JobReport::Mismatches(None) | JobReport::Consistency(None) => {
                println!("  {}: ✓ consistent", outcome.id);
            }
            JobReport::Mismatches(Some(table)) => {
                println!("  {}: {} mismatching rows", outcome.id, table.len());
                println!("{table}");
            }
            JobReport::Consistency(Some(report)) => {
                println!("  {}: {} inconsistent rows", outcome.id, report.len());
                println!("{report}");
            }
        }
    }

    if let Some(path) = output {
        data_service::save_records(path, &response.store)?;
        println!("✓ Wrote {} records to {}", response.store.len(), path.display());
    }
    println!("Failed checks: {}", response.failed_checks());
    Ok(())
}
