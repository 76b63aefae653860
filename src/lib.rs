#![doc(test(attr(deny(warnings))))]

//! Price Rewriter finds elements marked with a price class, reads their raw
//! `data-price` value and replaces their text with a German Euro rendering
//! such as `1.234,50 €`.
//!
//! ```
//! use price_rewriter::rewrite::{Page, PriceRewriter};
//!
//! let mut page = Page::parse(r#"<span class="price" data-price="1234.5">$1,234.50</span>"#);
//! let rewriter: PriceRewriter = PriceRewriter::default();
//! page.content_loaded(&rewriter);
//! assert_eq!(
//!     page.to_html(),
//!     r#"<span class="price" data-price="1234.5">1.234,50&nbsp;€</span>"#
//! );
//! ```

pub mod cli;
pub mod config;
pub mod currency;
pub mod document;
pub mod errors;
pub mod rewrite;
pub mod utils;

pub use currency::{format_eur, PriceFormatter};
pub use document::Document;
pub use errors::PriceError;
pub use rewrite::{Page, PriceRewriter, RewriteReport};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Price Rewriter tracing initialized.");
    });
}
