use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use recapp::pipeline::Pipeline;
use recapp::preprocessing::Preprocessor;
use recapp::training::{PredictionRequest, TrainEngine};

fn create_csv(n_rows: usize, n_features: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut csv = String::from("no,name");
    for i in 0..n_features {
        csv.push_str(&format!(",feature_{}", i));
    }
    csv.push_str(",label\n");

    for row in 0..n_rows {
        let values: Vec<f64> = (0..n_features).map(|_| rng.gen::<f64>() * 10.0).collect();
        let label = match values.iter().sum::<f64>() / n_features as f64 {
            s if s < 4.0 => "low",
            s if s < 6.0 => "mid",
            _ => "high",
        };
        csv.push_str(&format!("{},row{}", row + 1, row));
        for v in &values {
            csv.push_str(&format!(",{:.4}", v));
        }
        csv.push_str(&format!(",{}\n", label));
    }
    csv
}

fn request(n_features: usize) -> PredictionRequest {
    (0..n_features).fold(PredictionRequest::new(), |req, i| req.with_field(format!("feature_{}", i), "5.0"))
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    for n_rows in [1000, 5000, 10000].iter() {
        let csv = create_csv(*n_rows, 8);
        let req = request(8);
        let pipeline = Pipeline::default();

        group.bench_with_input(BenchmarkId::new("predict", n_rows), &csv, |b, csv| {
            b.iter(|| pipeline.predict(black_box(csv.as_bytes()), &req).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("load", n_rows), &csv, |b, csv| {
            b.iter(|| pipeline.load(black_box(csv.as_bytes())).unwrap())
        });
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");

    let csv = create_csv(5000, 8);
    let pipeline = Pipeline::default();
    let table = pipeline.load(csv.as_bytes()).unwrap();
    let prepared = Preprocessor::new().clean(&table).unwrap();
    let req = request(8);

    group.bench_function("clean", |b| b.iter(|| Preprocessor::new().clean(black_box(&table)).unwrap()));
    group.bench_function("train_and_predict", |b| {
        b.iter(|| TrainEngine::default().train_and_predict(black_box(&prepared), &req).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_stages);
criterion_main!(benches);
