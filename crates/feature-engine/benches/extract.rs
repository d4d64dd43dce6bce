use contour::RawContour;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use feature_engine::{
    FeatureConfig, RecordingContours, SpectralContours, VoiceFeatureExtractor,
};

const HOP: f64 = 0.01;

fn recording(frames: usize) -> RecordingContours {
    let contour = |f: &dyn Fn(usize) -> Option<f64>| {
        RawContour::new(HOP, (0..frames).map(f).collect()).unwrap()
    };

    // voiced speech with a pause every 50 frames
    let pitch = contour(&|i| {
        if i % 50 < 8 {
            None
        } else {
            Some(120.0 + 10.0 * (i as f64 * 0.05).sin())
        }
    });
    let intensity = contour(&|i| Some(0.02 + 0.005 * (i as f64 * 0.11).cos().abs()));
    let rms = contour(&|i| Some(if i % 50 < 8 { 0.001 } else { 0.1 }));

    RecordingContours {
        pitch,
        intensity: Some(intensity),
        rms: Some(rms),
        spectral: SpectralContours {
            hnr_db: Some(contour(&|_| Some(15.0))),
            f1: Some(contour(&|i| Some(600.0 + (i % 7) as f64))),
            f2: Some(contour(&|i| Some(1200.0 + (i % 11) as f64))),
            ..Default::default()
        },
    }
}

fn benchmark_extract(c: &mut Criterion) {
    let extractor = VoiceFeatureExtractor::new(FeatureConfig::default()).unwrap();
    let mut group = c.benchmark_group("Voice feature extraction");

    // 1 s, 10 s and 60 s at 10 ms hop
    for frames in [100usize, 1_000, 6_000].iter() {
        let contours = recording(*frames);
        group.bench_with_input(BenchmarkId::new("extract", frames), &contours, |b, contours| {
            b.iter(|| {
                let _ = black_box(extractor.extract(black_box(contours)));
            });
        });
    }

    group.finish();
}

fn benchmark_silence(c: &mut Criterion) {
    let extractor = VoiceFeatureExtractor::new(FeatureConfig::default()).unwrap();
    let silent = RecordingContours::from_pitch(RawContour::new(HOP, vec![None; 1_000]).unwrap());

    c.bench_function("extract_silence", |b| {
        b.iter(|| {
            let _ = black_box(extractor.extract(black_box(&silent)));
        });
    });
}

criterion_group!(benches, benchmark_extract, benchmark_silence);
criterion_main!(benches);
