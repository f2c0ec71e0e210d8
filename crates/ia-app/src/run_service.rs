//! Execution of configured aggregation jobs.

use ia_aggregate::{
    AggContext, ConsistencyReport, MismatchTable, RegionAggregation, RegionComponents, Recursion,
    Targets, TimeAggregation, VariableAggregation, aggregate, aggregate_region, aggregate_time,
    append_into, check_aggregate, check_aggregate_region, check_aggregate_time,
    check_internal_consistency,
};
use ia_config::{Config, JobDef, JobKindDef, RecursiveDef, RegionComponentsDef, TargetsDef};
use ia_core::DiagnosticSink;
use ia_store::RecordStore;

use crate::error::{AppError, AppResult};

/// What a single job produced.
#[derive(Debug, Clone)]
pub enum JobReport {
    Aggregated { output: RecordStore, appended: bool },
    Mismatches(Option<MismatchTable>),
    Consistency(Option<ConsistencyReport>),
}

impl JobReport {
    /// A check that found divergences.
    pub fn failed(&self) -> bool {
        match self {
            JobReport::Aggregated { .. } => false,
            JobReport::Mismatches(table) => table.is_some(),
            JobReport::Consistency(report) => report.is_some(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub id: String,
    pub report: JobReport,
}

/// Final working store and the outcome of every job, in order.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub store: RecordStore,
    pub outcomes: Vec<JobOutcome>,
}

impl RunResponse {
    pub fn failed_checks(&self) -> usize {
        self.outcomes.iter().filter(|o| o.report.failed()).count()
    }
}

fn targets(def: &TargetsDef) -> Targets {
    match def {
        TargetsDef::One(v) => Targets::One(v.clone()),
        TargetsDef::Many(vs) => Targets::Many(vs.clone()),
    }
}

fn recursion(def: &RecursiveDef) -> AppResult<Recursion> {
    let token = def
        .token()
        .ok_or_else(|| AppError::InvalidInput(format!("invalid recursive mode: {def:?}")))?;
    token.parse().map_err(AppError::InvalidInput)
}

pub fn variable_request(kind: &JobKindDef) -> AppResult<VariableAggregation> {
    let JobKindDef::Variable {
        variable,
        components,
        method,
        recursive,
    } = kind
    else {
        return Err(AppError::InvalidInput("not a variable job".to_string()));
    };
    Ok(VariableAggregation {
        variable: targets(variable),
        components: components.clone(),
        method: method.parse()?,
        recursive: recursion(recursive)?,
    })
}

pub fn region_request(kind: &JobKindDef) -> AppResult<RegionAggregation> {
    let JobKindDef::Region {
        variable,
        region,
        subregions,
        components,
        method,
        weight,
        drop_negative_weights,
    } = kind
    else {
        return Err(AppError::InvalidInput("not a region job".to_string()));
    };
    let components = match components {
        RegionComponentsDef::Flag(false) => RegionComponents::None,
        RegionComponentsDef::Flag(true) => RegionComponents::Auto,
        RegionComponentsDef::Explicit(arg) => RegionComponents::Explicit(arg.clone()),
    };
    Ok(RegionAggregation {
        variable: targets(variable),
        region: region.clone(),
        subregions: subregions.clone(),
        components,
        method: method.parse()?,
        weight: weight.clone(),
        drop_negative_weights: *drop_negative_weights,
    })
}

pub fn time_request(kind: &JobKindDef) -> AppResult<TimeAggregation> {
    let JobKindDef::Time {
        variable,
        column,
        value,
        components,
        method,
    } = kind
    else {
        return Err(AppError::InvalidInput("not a time job".to_string()));
    };
    Ok(TimeAggregation {
        variable: targets(variable),
        column: column.clone(),
        value: value.clone(),
        components: components.clone(),
        method: method.parse()?,
    })
}

fn finish(store: &mut RecordStore, output: RecordStore, append: bool) -> AppResult<JobReport> {
    if append {
        append_into(store, output.clone())?;
    }
    Ok(JobReport::Aggregated {
        output,
        appended: append,
    })
}

fn run_job(store: &mut RecordStore, job: &JobDef, ctx: &mut AggContext<'_>) -> AppResult<JobReport> {
    match &job.kind {
        JobKindDef::Variable { .. } => {
            let req = variable_request(&job.kind)?;
            if job.check {
                return Ok(JobReport::Mismatches(check_aggregate(store, &req, ctx)?));
            }
            let output = aggregate(store, &req, ctx)?;
            finish(store, output, job.append)
        }
        JobKindDef::Region { .. } => {
            let req = region_request(&job.kind)?;
            if job.check {
                return Ok(JobReport::Mismatches(check_aggregate_region(store, &req, ctx)?));
            }
            let output = aggregate_region(store, &req, ctx)?;
            finish(store, output, job.append)
        }
        JobKindDef::Time { .. } => {
            let req = time_request(&job.kind)?;
            if job.check {
                return Ok(JobReport::Mismatches(check_aggregate_time(store, &req, ctx)?));
            }
            let output = aggregate_time(store, &req, ctx)?;
            finish(store, output, job.append)
        }
        JobKindDef::Consistency { components } => Ok(JobReport::Consistency(
            check_internal_consistency(store, *components, ctx)?,
        )),
    }
}

/// Run the jobs of `config` in order against `store`.
///
/// Appending jobs extend the working store seen by later jobs. The first
/// failing job aborts the run.
pub fn run_jobs(
    mut store: RecordStore,
    config: &Config,
    sink: &mut dyn DiagnosticSink,
) -> AppResult<RunResponse> {
    let regions = config.region_mapping()?;
    let mut ctx = AggContext::new(sink)
        .with_delimiter(config.delimiter.clone())?
        .with_tolerance(config.tolerance.into())
        .with_regions(&regions);

    let mut outcomes = Vec::with_capacity(config.jobs.len());
    for job in &config.jobs {
        tracing::debug!(job = %job.id, check = job.check, append = job.append, "running job");
        let report = run_job(&mut store, job, &mut ctx)?;
        if report.failed() {
            tracing::info!(job = %job.id, "check found inconsistencies");
        }
        outcomes.push(JobOutcome {
            id: job.id.clone(),
            report,
        });
    }

    Ok(RunResponse { store, outcomes })
}
