use super::CliError;
use super::helpers::*;
use grace_core::common::units::{UnitTable, UnitTableProvider};
use grace_core::domain::{
    GravityError, MassUnit, OutputUnit, SphericalHarmonicSet, validate_degree,
};
use grace_core::numerics::{
    ClenshawSummation, ClenshawSummationApi, ClenshawSummationInput, ColomboRecursion,
    LegendreRecursionApi, PointLoadInput, PointLoadSynthesis, PointLoadSynthesisApi,
    format_numeric,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args)]
pub(super) struct PointLoadArgs {
    /// JSON request with data, lon, lat, lmax, mmax, units and love numbers
    #[arg(long)]
    request: PathBuf,

    /// JSON coefficient output path
    #[arg(long)]
    output: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct SynthesizeArgs {
    /// JSON request with clm, slm, lon, lat, lmax, radius, units and love numbers
    #[arg(long)]
    request: PathBuf,

    /// JSON spatial output path
    #[arg(long)]
    output: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct PlmArgs {
    /// Maximum degree
    #[arg(long, allow_negative_numbers = true)]
    lmax: i32,

    /// cos(colatitude) values, comma separated
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    x: Vec<f64>,

    /// Optional JSON output path; a text table goes to stdout otherwise
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(super) fn run_point_load_command(args: PointLoadArgs) -> Result<i32, CliError> {
    let request: PointLoadRequest = read_request(&args.request)?;
    let lmax = validate_degree("lmax", request.lmax)?;
    let unit = MassUnit::from_selector(request.units)?;
    let table = request.love.spatial_table(lmax)?;

    let mut input = PointLoadInput::new(
        &request.data,
        &request.lon,
        &request.lat,
        request.lmax,
        &table,
    )
    .with_unit(unit);
    if let Some(mmax) = request.mmax {
        input = input.with_mmax(mmax);
    }

    let coefficients = PointLoadSynthesis.gen_point_load(input)?;
    write_report(&args.output, &CoefficientReport::from(&coefficients))?;
    info!(output = %args.output.display(), "wrote point-load coefficients");
    Ok(0)
}

pub(super) fn run_synthesize_command(args: SynthesizeArgs) -> Result<i32, CliError> {
    let request: SynthesizeRequest = read_request(&args.request)?;
    let lmax = validate_degree("lmax", request.lmax)?;
    let unit = OutputUnit::from_selector(request.units)?;
    let coefficients = SphericalHarmonicSet::from_rows(&request.clm, &request.slm)?;

    let table = match (&request.love, unit) {
        (Some(love), _) => love.harmonic_table(lmax)?,
        (None, OutputUnit::Norm) => UnitTable::uniform(lmax),
        (None, unit) => {
            return Err(GravityError::invalid_argument(
                "love",
                format!("load love numbers are required for units '{unit}'"),
            )
            .into());
        }
    };

    let input = ClenshawSummationInput::new(
        &coefficients,
        &request.lon,
        &request.lat,
        request.lmax,
        &table,
    )
    .with_radius(request.radius)
    .with_unit(unit);
    let field = ClenshawSummation::new().clenshaw_summation(input)?;

    let report = SpatialReport {
        units: unit.to_string(),
        warnings: report_warnings(&field.warnings),
        values: field.values,
    };
    write_report(&args.output, &report)?;
    info!(output = %args.output.display(), points = report.values.len(), "wrote spatial field");
    Ok(0)
}

#[derive(Debug, Serialize)]
struct PlmRow {
    l: usize,
    m: usize,
    values: Vec<f64>,
    derivatives: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct PlmReport {
    lmax: usize,
    x: Vec<f64>,
    rows: Vec<PlmRow>,
    warnings: Vec<String>,
}

pub(super) fn run_plm_command(args: PlmArgs) -> Result<i32, CliError> {
    let table = ColomboRecursion.plm_colombo(args.lmax, &args.x)?;
    let warnings = report_warnings(&table.domain_warnings());

    let mut rows = Vec::new();
    for l in 0..=table.lmax() {
        for m in 0..=l {
            rows.push(PlmRow {
                l,
                m,
                values: table.plm_column(l, m),
                derivatives: (0..table.point_count())
                    .map(|point| table.dplm(l, m, point))
                    .collect(),
            });
        }
    }

    match args.output {
        Some(path) => {
            let report = PlmReport {
                lmax: table.lmax(),
                x: table.x().to_vec(),
                rows,
                warnings,
            };
            write_report(&path, &report)?;
        }
        None => {
            for row in &rows {
                for (point, x) in table.x().iter().enumerate() {
                    println!(
                        "{} {} {} {} {}",
                        row.l,
                        row.m,
                        format_numeric(*x),
                        format_numeric(row.values[point]),
                        format_numeric(row.derivatives[point]),
                    );
                }
            }
        }
    }

    Ok(0)
}
