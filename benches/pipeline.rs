// benches/pipeline.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use market_enrich::config::catalog::Catalog;
use market_enrich::config::options::PipelineOptions;
use market_enrich::progress::NullProgress;
use market_enrich::stages::normalize::Normalizer;
use market_enrich::stages::sentiment::NeutralSentiment;
use market_enrich::{run_pipeline, RawRecord};

const BRANDS: [&str; 6] = ["HP", "Dell", "Lenovo", "Asus", "Acer", "MSI"];
const CPUS: [&str; 6] = ["Core i5-1135G7", "Core i7-1165G7", "Ryzen 5 5500U", "Ryzen 7 5800H", "Celeron N4020", "Core i3"];

fn synthetic(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            let price = 1500 + (i * 211) % 14_000;
            RawRecord {
                title: format!(
                    "{} Laptop {i} {} {}GB RAM {}GB SSD 15.6\"",
                    BRANDS[i % 6],
                    CPUS[(i * 5) % 6],
                    [4, 8, 16, 32][i % 4],
                    [256, 512, 1024][i % 3],
                ),
                price_text: Some(format!("{price}.00 Dhs")),
                old_price_text: (i % 3 == 0).then(|| format!("{}.00 Dhs", price + price / 5)),
                rating_text: (i % 2 == 0).then(|| format!("{}.{} out of 5", 3 + i % 2, i % 10)),
                image_reference: Some(format!("img/{i}.jpg")),
                ..RawRecord::default()
            }
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let raws = synthetic(2_000);
    let opts = PipelineOptions::default();
    let catalog = Catalog::new(&opts.catalog).unwrap_or_else(|e| panic!("catalog: {e}"));

    c.bench_function("normalize_2k", |b| {
        let n = Normalizer::new(&catalog);
        b.iter(|| black_box(n.normalize_all(black_box(raws.clone())).len()))
    });

    c.bench_function("pipeline_2k", |b| {
        b.iter(|| {
            let out = run_pipeline(black_box(raws.clone()), &opts, &NeutralSentiment, &mut NullProgress);
            black_box(out.map(|e| e.records.len()).unwrap_or(0))
        })
    });

    let mut no_ml = opts.clone();
    no_ml.detector.enabled = false;
    c.bench_function("pipeline_2k_no_detector", |b| {
        b.iter(|| {
            let out = run_pipeline(black_box(raws.clone()), &no_ml, &NeutralSentiment, &mut NullProgress);
            black_box(out.map(|e| e.records.len()).unwrap_or(0))
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
