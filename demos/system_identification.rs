//! System identification with Wiener, LMS and NLMS.
//!
//! An unknown FIR system is driven by white noise and observed with additive
//! measurement noise. The Wiener solution, a plain LMS run and an NLMS run
//! estimate its taps; the plot shows how the adaptive taps approach the
//! Wiener solution over time.
//!
//! Run with: `cargo run --example system_identification`
//!
//! Output: `output/system_identification.png` and `output/system_identification.csv`

mod common;

use adaptfir::{fir_filter, rms, run, LmsConfig, LmsOutput, WienerFilter};
use plotters::prelude::*;
use std::error::Error;
use std::fs::{self, File};
use std::io::Write;

const SAMPLES: usize = 4000;
const UNKNOWN_SYSTEM: [f64; 5] = [0.7, -0.4, 0.25, 0.1, -0.05];
const ORDER: usize = UNKNOWN_SYSTEM.len() - 1;

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== System Identification Demo ===\n");
    fs::create_dir_all("output")?;

    let x = common::white_noise(SAMPLES, 1.0, 42);
    let clean = fir_filter(&UNKNOWN_SYSTEM, &x)?;
    let noise = common::white_noise(SAMPLES, 0.05, 7);
    let d = common::add(&clean, &noise);

    println!("Input RMS:             {:.4}", rms(&x)?);
    println!("Measurement noise RMS: {:.4}", rms(&noise)?);

    let wiener = WienerFilter::fit(&x, &d, ORDER)?;
    let lms_run = run(&x, &d, &LmsConfig::new(ORDER, 0.01))?;
    let nlms_run = run(&x, &d, &LmsConfig::new(ORDER, 0.2).normalized(true))?;

    println!("\n  tap   true      wiener    lms       nlms");
    for k in 0..=ORDER {
        println!(
            "  {:<4}  {:>8.4}  {:>8.4}  {:>8.4}  {:>8.4}",
            k,
            UNKNOWN_SYSTEM[k],
            wiener.weights()[k],
            lms_run.weights[k],
            nlms_run.weights[k]
        );
    }
    println!("\nWiener MMSE: {:.6}", wiener.mmse(&x, &d)?);
    println!(
        "Noise power: {:.6} (lower bound for the MMSE)",
        adaptfir::mean_square(&noise)?
    );

    println!("\nWriting CSV to output/system_identification.csv...");
    write_csv(&lms_run, &nlms_run)?;

    println!("Generating plot to output/system_identification.png...");
    generate_plot(&lms_run, &nlms_run, wiener.weights())?;

    println!("\nDone!");
    Ok(())
}

fn write_csv(lms_run: &LmsOutput, nlms_run: &LmsOutput) -> Result<(), Box<dyn Error>> {
    let mut file = File::create("output/system_identification.csv")?;
    let header: Vec<String> = (0..=ORDER)
        .flat_map(|k| [format!("lms_w{}", k), format!("nlms_w{}", k)])
        .collect();
    writeln!(file, "sample,lms_error,nlms_error,{}", header.join(","))?;

    for (n, (w_lms, w_nlms)) in lms_run
        .trajectory
        .iter()
        .zip(nlms_run.trajectory.iter())
        .enumerate()
    {
        let taps: Vec<String> = w_lms
            .iter()
            .zip(w_nlms)
            .flat_map(|(a, b)| [format!("{:.6}", a), format!("{:.6}", b)])
            .collect();
        writeln!(
            file,
            "{},{:.6},{:.6},{}",
            n,
            lms_run.error[n],
            nlms_run.error[n],
            taps.join(",")
        )?;
    }

    Ok(())
}

fn generate_plot(
    lms_run: &LmsOutput,
    nlms_run: &LmsOutput,
    wiener: &[f64],
) -> Result<(), Box<dyn Error>> {
    let root =
        BitMapBackend::new("output/system_identification.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((2, 1));
    let colors = [BLUE, RED, GREEN, MAGENTA, CYAN];

    for (area, (title, result)) in areas
        .iter()
        .zip([("LMS (mu = 0.01)", lms_run), ("NLMS (mu = 0.2)", nlms_run)])
    {
        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("{} tap trajectories", title),
                ("sans-serif", 22).into_font(),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..SAMPLES as f64, -0.6f64..0.9f64)?;

        chart
            .configure_mesh()
            .x_desc("Sample")
            .y_desc("Weight")
            .draw()?;

        for (k, &color) in colors.iter().enumerate().take(ORDER + 1) {
            let tap = result.trajectory.tap(k);
            chart
                .draw_series(LineSeries::new(
                    tap.iter().enumerate().map(|(n, &w)| (n as f64, w)),
                    ShapeStyle::from(&color).stroke_width(2),
                ))?
                .label(format!("w{}", k))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

            // Wiener solution as a thin reference line
            chart.draw_series(LineSeries::new(
                [(0.0, wiener[k]), (SAMPLES as f64, wiener[k])],
                color.mix(0.4).stroke_width(1),
            ))?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
