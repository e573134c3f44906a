use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crxshim::cookies::{CookieDetails, CookiesApi, GetAllDetails};
use crxshim::handler::{EventSink, ExtensionEvent};
use crxshim::host::memory::MemoryHost;
use std::sync::Arc;
use url::Url;

fn benchmark_jar_seed(c: &mut Criterion) {
    let host = MemoryHost::new();
    let url = Url::parse("https://example.com").unwrap();

    c.bench_function("jar_seed_cookie", |b| {
        b.iter(|| {
            host.seed_cookie(black_box(&url), black_box("foo=bar; Path=/; Secure"));
        })
    });
}

fn benchmark_api_get(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let host = Arc::new(MemoryHost::new());
    let url = Url::parse("https://example.com/foo/bar").unwrap();
    // Pre-populate
    for i in 0..100 {
        host.seed_cookie(&url, &format!("cookie{}=val; Path=/foo", i));
    }
    let sink: EventSink = Arc::new(|_: ExtensionEvent| {});
    let api = CookiesApi::new("bench", sink, host);
    let details = CookieDetails::new("https://example.com/foo/bar").name("cookie50");

    c.bench_function("cookies_get", |b| {
        b.to_async(&rt).iter(|| async { black_box(api.get(black_box(&details)).await) })
    });

    c.bench_function("cookies_get_all", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(api.get_all(&GetAllDetails::default()).await) })
    });
}

criterion_group!(benches, benchmark_jar_seed, benchmark_api_get);
criterion_main!(benches);
