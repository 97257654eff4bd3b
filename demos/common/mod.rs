//! Synthetic signal generators shared by the demos.

#![allow(dead_code)] // Functions used across multiple examples

use std::f64::consts::PI;

/// Generates a sine wave.
///
/// # Arguments
/// * `samples` - Number of samples to generate
/// * `sample_rate` - Sample rate in Hz
/// * `frequency` - Sine frequency in Hz
/// * `amplitude` - Peak amplitude
pub fn sine_wave(samples: usize, sample_rate: f64, frequency: f64, amplitude: f64) -> Vec<f64> {
    (0..samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Generates white noise using a simple LCG random number generator.
///
/// # Arguments
/// * `samples` - Number of samples to generate
/// * `amplitude` - Peak amplitude (noise will be in range [-amplitude, amplitude])
/// * `seed` - Random seed for reproducibility
pub fn white_noise(samples: usize, amplitude: f64, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..samples)
        .map(|_| {
            // Simple LCG: x_{n+1} = (a * x_n + c) mod m
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let normalized = (state as f64 / u64::MAX as f64) * 2.0 - 1.0;
            amplitude * normalized
        })
        .collect()
}

/// Elementwise sum of two equal-length signals.
pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

/// Moving average of the squared signal, used for learning curves.
pub fn smoothed_power(x: &[f64], window: usize) -> Vec<f64> {
    let mut acc = 0.0;
    let mut out = Vec::with_capacity(x.len());
    for (i, &v) in x.iter().enumerate() {
        acc += v * v;
        if i >= window {
            acc -= x[i - window] * x[i - window];
        }
        out.push(acc / window.min(i + 1) as f64);
    }
    out
}
