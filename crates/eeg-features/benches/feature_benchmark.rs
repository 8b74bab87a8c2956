//! Throughput benchmarks for the feature engines

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eeg_core::FrequencyBand;
use eeg_features::{
    bands_power, compute_psd, hjorth_table, AverageType, FeatureConfig, FeatureExtractor, SpectralMethod,
};
use eeg_simulation::{EegConfig, EegSimulator, SignalPattern};
use ndarray::Array2;

fn recording(channels: usize, samples: usize) -> Array2<f64> {
    let config = EegConfig {
        channel_count: channels,
        samples,
        pattern: SignalPattern::Rhythm { frequency: 10.0, amplitude: 20.0 },
        noise_std: 5.0,
        ..EegConfig::default()
    };
    EegSimulator::new(config).unwrap().generate().unwrap()
}

fn test_bands() -> Vec<FrequencyBand> {
    [(1.0, 4.0), (4.0, 8.0), (8.0, 12.0), (12.0, 16.0), (16.0, 20.0)]
        .into_iter()
        .map(|band| FrequencyBand::try_from(band).unwrap())
        .collect()
}

/// Band power per estimator and averaging rule
fn bench_bands_power(c: &mut Criterion) {
    let mut group = c.benchmark_group("bands_power");
    let signal = recording(16, 1250);
    let bands = test_bands();

    for method in [SpectralMethod::Welch, SpectralMethod::Medfilt] {
        for avg in [AverageType::Mean, AverageType::Median] {
            group.bench_with_input(
                BenchmarkId::new(method.as_str(), avg.as_str()),
                &(method, avg),
                |b, &(method, avg)| {
                    b.iter(|| bands_power(black_box(&signal), 125.0, &bands, method, avg).unwrap());
                },
            );
        }
    }

    group.finish();
}

/// Welch PSD as the recording grows
fn bench_psd(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_psd");

    for &samples in &[600, 2500, 12500] {
        let signal = recording(16, samples);
        group.bench_with_input(BenchmarkId::new("16ch", samples), &signal, |b, signal| {
            b.iter(|| compute_psd(black_box(signal), 125.0).unwrap());
        });
    }

    group.finish();
}

fn bench_hjorth(c: &mut Criterion) {
    let mut group = c.benchmark_group("hjorth_table");
    let signal = recording(16, 12500);

    for &segment_size in &[10, 125, 1250] {
        group.bench_with_input(BenchmarkId::from_parameter(segment_size), &segment_size, |b, &size| {
            b.iter(|| hjorth_table(black_box(&signal), size, None).unwrap());
        });
    }

    group.finish();
}

fn bench_extractor(c: &mut Criterion) {
    let extractor = FeatureExtractor::new(FeatureConfig::openbci_default()).unwrap();
    let signal = recording(16, 2500);

    c.bench_function("extract_openbci", |b| {
        b.iter(|| extractor.extract(black_box(&signal)).unwrap());
    });
}

criterion_group!(benches, bench_bands_power, bench_psd, bench_hjorth, bench_extractor);
criterion_main!(benches);
