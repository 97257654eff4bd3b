//! LMS and NLMS learning curves on a colored input.
//!
//! The eigenvalue spread of the input autocorrelation matrix governs how fast
//! plain LMS converges. This demo estimates the spread, then compares the
//! smoothed squared error of LMS at two step sizes against NLMS.
//!
//! Run with: `cargo run --example convergence`
//!
//! Output: `output/convergence.png`

mod common;

use adaptfir::linalg::JACOBI_TOL;
use adaptfir::{autocorr, fir_filter, lms, mean_square, toeplitz, Bias};
use plotters::prelude::*;
use std::error::Error;
use std::fs;

const SAMPLES: usize = 6000;
const ORDER: usize = 7;
const WINDOW: usize = 100;

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Convergence Demo ===\n");
    fs::create_dir_all("output")?;

    // Colored input: white noise through a lowpass FIR
    let white = common::white_noise(SAMPLES, 1.0, 3);
    let x = fir_filter(&[1.0, 0.9, 0.5], &white)?;
    let system = [0.3, 0.5, -0.2, 0.1, 0.05, -0.05, 0.02, 0.01];
    let d = common::add(&fir_filter(&system, &x)?, &common::white_noise(SAMPLES, 0.01, 9));

    let r = autocorr(&x, ORDER, Bias::Biased)?;
    let rx = toeplitz(r.non_negative(), ORDER)?;
    let eigen = rx.eigen_symmetric(100 * (ORDER + 1) * (ORDER + 1), JACOBI_TOL)?;
    let lambda_max = eigen.eigenvalues[0];
    let lambda_min = eigen.eigenvalues[ORDER];
    println!("Input power:           {:.4}", mean_square(&x)?);
    println!("Eigenvalue spread:     {:.1}", lambda_max / lambda_min);
    println!("LMS stability bound:   mu < {:.4}", 2.0 / lambda_max);

    let runs = [
        ("LMS mu = 0.005", lms(&x, &d, ORDER, 0.005, false, None)?),
        ("LMS mu = 0.02", lms(&x, &d, ORDER, 0.02, false, None)?),
        ("NLMS mu = 0.5", lms(&x, &d, ORDER, 0.5, true, None)?),
    ];

    let curves: Vec<(&str, Vec<f64>)> = runs
        .iter()
        .map(|(label, result)| (*label, common::smoothed_power(&result.error, WINDOW)))
        .collect();

    for (label, curve) in &curves {
        println!("{:<16} final MSE {:.2e}", label, curve[SAMPLES - 1]);
    }

    println!("\nGenerating plot to output/convergence.png...");
    let root = BitMapBackend::new("output/convergence.png", (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Learning curves (smoothed e²)", ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..SAMPLES as f64, (1e-6f64..10.0f64).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("Sample")
        .y_desc("Squared error")
        .draw()?;

    for ((label, curve), color) in curves.iter().zip([BLUE, RED, GREEN]) {
        chart
            .draw_series(LineSeries::new(
                curve
                    .iter()
                    .enumerate()
                    .map(|(n, &e)| (n as f64, e.max(1e-6))),
                ShapeStyle::from(&color).stroke_width(2),
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    println!("Done!");
    Ok(())
}
