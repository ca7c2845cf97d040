use criterion::{black_box, criterion_group, criterion_main, Criterion};
use legacy_site::data::{BasePhoto, BasePlaque};
use legacy_site::{merge_plaque, ListOptions, Plaque, PlaqueResolver, ResolverConfig};
use serde_json::json;
use tempfile::tempdir;

const RECORDS: usize = 2_000;

fn write_dataset(dir: &std::path::Path) {
    let base: Vec<_> = (0..RECORDS)
        .map(|i| {
            json!({
                "id": i,
                "title": format!("Person{}, Some", i),
                "inscription": format!("Some Person{} lived here", i),
                "address": format!("{} Example Street, London", i),
                "latitude": 51.46 + (i % 100) as f64 * 0.001,
                "longitude": -0.15,
                "photos": [
                    { "shot_name": "front_establish", "thumbnail_url": format!("https://img/{}/e.jpg", i) },
                    { "shot_name": "plaque_close_up", "thumbnail_url": format!("https://img/{}/c.jpg", i) }
                ]
            })
        })
        .collect();
    let enriched: Vec<_> = (0..RECORDS)
        .step_by(4)
        .map(|i| json!({ "id": i.to_string(), "profession": "Engineer", "keyFacts": ["One", "Two"] }))
        .collect();

    std::fs::write(dir.join("openplaques_uk.json"), serde_json::to_vec(&base).expect("base")).expect("write base");
    std::fs::write(dir.join("plaques.json"), serde_json::to_vec(&enriched).expect("enriched"))
        .expect("write enriched");
}

fn bench_merge(c: &mut Criterion) {
    let base = BasePlaque {
        id: "42".to_string(),
        title: Some("Lovelace, Ada".to_string()),
        inscription: Some("Ada Lovelace lived here".to_string()),
        address: Some("12 St James's Square".to_string()),
        latitude: Some(51.507),
        longitude: Some(-0.134),
        uri: None,
        photos: Some(vec![
            BasePhoto {
                shot_name: Some("front_establish".to_string()),
                thumbnail_url: Some("https://img/e.jpg".to_string()),
            },
            BasePhoto {
                shot_name: Some("plaque_close_up".to_string()),
                thumbnail_url: Some("https://img/c.jpg".to_string()),
            },
        ]),
    };
    let enrichment = Plaque {
        id: "42".to_string(),
        profession: Some("Mathematician".to_string()),
        biography: Some("b".repeat(600)),
        ..Default::default()
    };

    c.bench_function("merge_plaque", |b| {
        b.iter(|| merge_plaque(black_box(&base), Some(black_box(&enrichment))))
    });
}

fn bench_resolver(c: &mut Criterion) {
    let tmp = tempdir().expect("tempdir");
    write_dataset(tmp.path());

    let uncached = PlaqueResolver::new(ResolverConfig::with_data_dir(tmp.path()));
    let cached = PlaqueResolver::new(ResolverConfig {
        cache_datasets: true,
        ..ResolverConfig::with_data_dir(tmp.path())
    });

    c.bench_function("find_by_id_uncached", |b| {
        b.iter(|| uncached.find_by_id(black_box("1540")))
    });
    c.bench_function("find_by_id_cached", |b| {
        b.iter(|| cached.find_by_id(black_box("1540")))
    });
    c.bench_function("list_all_region_cached", |b| {
        b.iter(|| {
            cached.list_all(ListOptions {
                limit: None,
                region_filter: Some(true),
            })
        })
    });
}

criterion_group!(benches, bench_merge, bench_resolver);
criterion_main!(benches);
