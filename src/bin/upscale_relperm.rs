use relperm_upscale::prelude::*;
use relperm_upscale::StrError;
use russell_lab::Matrix;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "upscale_relperm",
    about = "Computes steady-state upscaled relative permeability tensors of a block"
)]
struct Options {
    /// Input file (JSON)
    input: String,

    /// Output file (JSON) with the results
    #[structopt(short, long)]
    output: Option<String>,

    /// Prints the configuration and the iteration tables
    #[structopt(short, long)]
    verbose: bool,
}

/// Holds the results of one steady-state point
#[derive(Serialize)]
struct PointResults {
    flow_direction: usize,
    saturation: f64,
    saturation_upscaled: f64,
    kr_water: Vec<Vec<f64>>,
    kr_oil: Vec<Vec<f64>>,
}

/// Holds all results
#[derive(Serialize)]
struct Results {
    perm_upscaled: Vec<Vec<f64>>,
    points: Vec<PointResults>,
}

/// Converts a matrix into nested rows
fn to_rows(a: &Matrix) -> Vec<Vec<f64>> {
    let (nrow, ncol) = a.dims();
    (0..nrow).map(|i| (0..ncol).map(|j| a.get(i, j)).collect()).collect()
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();

    // load data
    let param = ParamUpscaling::read_json(&options.input)?;
    let grid = CartesianGrid::new(param.grid.ndiv, param.grid.cell_size)?;
    let res_prop = ReservoirProperty::from_param(
        grid.ncell(),
        &param.rock,
        &param.fluids,
        &param.rel_perm,
        &param.cap_pressure,
    )?;
    let mut config = Config::from_options(&param.options)?;
    config.verbose = options.verbose;
    if options.verbose {
        println!("{}", config);
    }

    // single-phase upscaling
    let ncell = grid.ncell();
    let mut upscaler = SteadyStateUpscaler::new(grid, res_prop, config)?;
    let perm_upscaled = upscaler.upscale_single_phase()?;
    println!("\nupscaled permeability =\n{}", perm_upscaled);

    // steady-state points
    let thin_line = format!("{:─^1$}", "", 84);
    println!("{}", thin_line);
    println!(
        "{:>4} {:>8} {:>8} {:>14} {:>14} {:>14} {:>14}",
        "dir", "s", "s_avg", "krw_xx", "krw_yy", "kro_xx", "kro_yy"
    );
    println!("{}", thin_line);
    let mut points = Vec::new();
    for (run_id, point) in param.points.iter().enumerate() {
        upscaler.set_run_id(run_id);
        let initial = vec![point.saturation; ncell];
        let (kr_w, kr_o) = upscaler.upscale_steady_state(
            point.flow_direction,
            &initial,
            point.saturation,
            param.pressure_drop,
            &perm_upscaled,
        )?;
        let saturation_upscaled = upscaler.last_saturation_upscaled(point.flow_direction)?;
        println!(
            "{:>4} {:>8.4} {:>8.4} {:>14.6e} {:>14.6e} {:>14.6e} {:>14.6e}",
            point.flow_direction,
            point.saturation,
            saturation_upscaled,
            kr_w.get(0, 0),
            kr_w.get(1, 1),
            kr_o.get(0, 0),
            kr_o.get(1, 1)
        );
        points.push(PointResults {
            flow_direction: point.flow_direction,
            saturation: point.saturation,
            saturation_upscaled,
            kr_water: to_rows(&kr_w),
            kr_oil: to_rows(&kr_o),
        });
    }
    println!("{}", thin_line);

    // write results
    if let Some(out) = &options.output {
        let results = Results {
            perm_upscaled: to_rows(&perm_upscaled),
            points,
        };
        if let Some(p) = Path::new(out).parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let json = serde_json::to_string_pretty(&results).map_err(|_| "cannot serialize results")?;
        let mut file = File::create(out).map_err(|_| "cannot create output file")?;
        file.write_all(json.as_bytes()).map_err(|_| "cannot write output file")?;
        println!("results written to {}", out);
    }
    Ok(())
}
