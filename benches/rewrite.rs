use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use price_rewriter::{
    document::{parse_html, to_html},
    format_eur, PriceRewriter,
};

fn build_catalog(item_count: usize) -> String {
    let mut html = String::from("<!DOCTYPE html><html><body><ul>");
    for idx in 0..item_count {
        let price = 0.99 + (idx % 5000) as f64 * 3.17;
        html.push_str(&format!(
            r#"<li><span class="name">Item {idx}</span><span class="price" data-price="{price}">${price:.2}</span></li>"#
        ));
    }
    html.push_str("</ul></body></html>");
    html
}

fn bench_format(c: &mut Criterion) {
    c.bench_function("format_eur", |b| {
        b.iter(|| format_eur(black_box(1_234_567.891)))
    });
}

fn bench_rewrite(c: &mut Criterion) {
    let html = build_catalog(black_box(10_000));
    let rewriter: PriceRewriter = PriceRewriter::default();

    c.bench_function("parse_catalog_10k", |b| {
        b.iter(|| black_box(parse_html(&html)))
    });

    c.bench_function("rewrite_catalog_10k", |b| {
        b.iter_batched(
            || parse_html(&html),
            |mut doc| {
                let report = rewriter.convert_all_prices(&mut doc);
                black_box((report, to_html(&doc)))
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_format, bench_rewrite);
criterion_main!(benches);
