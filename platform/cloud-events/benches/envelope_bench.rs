use cloud_events::{CloudEvent, CloudEventOptions, TypedCloudEvent};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

fn bench_construction(c: &mut Criterion) {
    c.bench_function("cloud_event_new_generated_id", |b| {
        b.iter(|| CloudEvent::new(black_box("com.example.created")))
    });

    c.bench_function("cloud_event_with_options", |b| {
        b.iter(|| {
            CloudEvent::with_options(
                black_box("com.example.created"),
                CloudEventOptions::new()
                    .with_subject("order-42")
                    .with_source("orders-service")
                    .with_id("evt-42"),
            )
        })
    });
}

fn bench_serialization(c: &mut Criterion) {
    let event = TypedCloudEvent::with_options(
        json!({"order_id": "order-42", "amount": 1000, "currency": "usd"}),
        "com.example.created",
        CloudEventOptions::new().with_source("orders-service"),
    )
    .expect("valid fixture");

    c.bench_function("typed_cloud_event_to_json", |b| {
        b.iter(|| black_box(&event).to_json_bytes())
    });

    let bytes = event.to_json_bytes().expect("serializable fixture");

    c.bench_function("typed_cloud_event_from_json", |b| {
        b.iter(|| TypedCloudEvent::<serde_json::Value>::from_json_slice(black_box(&bytes)))
    });
}

criterion_group!(benches, bench_construction, bench_serialization);
criterion_main!(benches);
