#![allow(dead_code)]

/// Separator the German currency convention puts before the symbol.
pub const NBSP: char = '\u{a0}';

/// A product list with three marked prices and one unmarked sibling.
pub const CATALOG_HTML: &str = concat!(
    r#"<ul>"#,
    r#"<li class="price" data-price="9.99">$9.99</li>"#,
    r#"<li class="price" data-price="1000">$1,000</li>"#,
    r#"<li class="price sale" data-price="0">free</li>"#,
    r#"<li class="note" data-price="5">five</li>"#,
    r#"</ul>"#
);

/// [`CATALOG_HTML`] after one price pass.
pub const CATALOG_REWRITTEN: &str = concat!(
    r#"<ul>"#,
    r#"<li class="price" data-price="9.99">9,99&nbsp;€</li>"#,
    r#"<li class="price" data-price="1000">1.000,00&nbsp;€</li>"#,
    r#"<li class="price sale" data-price="0">0,00&nbsp;€</li>"#,
    r#"<li class="note" data-price="5">five</li>"#,
    r#"</ul>"#
);

/// Expected rendering with the no-break space spelled out.
pub fn eur(amount: &str) -> String {
    format!("{amount}{NBSP}€")
}
