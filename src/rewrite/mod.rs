//! The price pass: find marked elements, reformat their raw price and
//! overwrite their visible text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    currency::{parse_price, CurrencyFormatter, PriceFormatter},
    document::{markup, Document, NodeId},
    errors::PriceError,
};

pub const DEFAULT_MARKER_CLASS: &str = "price";
pub const DEFAULT_PRICE_ATTRIBUTE: &str = "data-price";
/// Set to `"true"` on elements left untouched under [`InvalidPricePolicy::Flag`].
pub const INVALID_MARKER_ATTRIBUTE: &str = "data-price-invalid";

/// What the pass does with an element whose raw price has no numeric value.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum InvalidPricePolicy {
    /// Format the NaN sentinel like any other value (`NaN €`).
    #[default]
    Render,
    /// Leave the element's text as it was.
    Skip,
    /// Leave the text and mark the element with `data-price-invalid="true"`.
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSettings {
    pub marker_class: String,
    pub price_attribute: String,
    pub invalid_policy: InvalidPricePolicy,
}

impl Default for RewriteSettings {
    fn default() -> Self {
        Self {
            marker_class: DEFAULT_MARKER_CLASS.into(),
            price_attribute: DEFAULT_PRICE_ATTRIBUTE.into(),
            invalid_policy: InvalidPricePolicy::default(),
        }
    }
}

/// A marked element whose raw price did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidPrice {
    pub node: NodeId,
    /// `None` when the price attribute was missing altogether.
    pub raw: Option<String>,
}

/// Outcome of one pass over a document.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteReport {
    pub matched: usize,
    pub rewritten: usize,
    pub invalid: Vec<InvalidPrice>,
    pub processed_at: DateTime<Utc>,
}

impl RewriteReport {
    pub fn skipped(&self) -> usize {
        self.matched - self.rewritten
    }
}

pub struct PriceRewriter<F = PriceFormatter> {
    formatter: F,
    settings: RewriteSettings,
}

impl PriceRewriter<PriceFormatter> {
    pub fn from_config(config: &Config) -> Result<Self, PriceError> {
        config.validate()?;
        let formatter = PriceFormatter::new(&config.locale, &config.currency)?;
        Ok(Self::new(formatter, config.rewrite_settings()))
    }
}

impl Default for PriceRewriter<PriceFormatter> {
    fn default() -> Self {
        Self::new(PriceFormatter::default(), RewriteSettings::default())
    }
}

impl<F: CurrencyFormatter> PriceRewriter<F> {
    pub fn new(formatter: F, settings: RewriteSettings) -> Self {
        Self {
            formatter,
            settings,
        }
    }

    pub fn settings(&self) -> &RewriteSettings {
        &self.settings
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    /// Rewrites every marked element of `doc` in document order.
    ///
    /// The price attribute is only read, so running the pass again over the
    /// same tree produces the same text. Malformed prices never abort the pass.
    pub fn convert_all_prices(&self, doc: &mut Document) -> RewriteReport {
        let targets = doc.elements_with_class(&self.settings.marker_class);
        let mut report = RewriteReport {
            matched: targets.len(),
            rewritten: 0,
            invalid: Vec::new(),
            processed_at: Utc::now(),
        };

        for node in targets {
            if !doc.is_connected(node) {
                debug!(node = node.0, "price element was removed by an enclosing rewrite");
                continue;
            }
            let raw = doc
                .attribute(node, &self.settings.price_attribute)
                .map(str::to_string);
            let parsed = raw.as_deref().and_then(parse_price);

            if parsed.is_none() {
                warn!(
                    node = node.0,
                    raw = raw.as_deref().unwrap_or("<missing>"),
                    policy = ?self.settings.invalid_policy,
                    "price attribute has no numeric value"
                );
                report.invalid.push(InvalidPrice {
                    node,
                    raw: raw.clone(),
                });
                match self.settings.invalid_policy {
                    InvalidPricePolicy::Render => {}
                    InvalidPricePolicy::Skip => continue,
                    InvalidPricePolicy::Flag => {
                        doc.set_attribute(node, INVALID_MARKER_ATTRIBUTE, "true");
                        continue;
                    }
                }
            }

            let formatted = self.formatter.format_amount(parsed.unwrap_or(f64::NAN));
            debug!(node = node.0, raw = ?raw, formatted = %formatted, "rewriting price");
            doc.set_text_content(node, &formatted);
            report.rewritten += 1;
        }

        info!(
            matched = report.matched,
            rewritten = report.rewritten,
            invalid = report.invalid.len(),
            "price pass complete"
        );
        report
    }
}

/// A loaded page whose content-loaded event fires at most once.
#[derive(Debug, Clone)]
pub struct Page {
    document: Document,
    loaded: bool,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            loaded: false,
        }
    }

    pub fn parse(html: &str) -> Self {
        Self::new(markup::parse_html(html))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Signals that the page structure is complete and runs the price pass.
    ///
    /// Returns `None` when the event already fired.
    pub fn content_loaded<F: CurrencyFormatter>(
        &mut self,
        rewriter: &PriceRewriter<F>,
    ) -> Option<RewriteReport> {
        if self.loaded {
            debug!("content-loaded already dispatched");
            return None;
        }
        self.loaded = true;
        Some(rewriter.convert_all_prices(&mut self.document))
    }

    pub fn to_html(&self) -> String {
        markup::to_html(&self.document)
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl CurrencyFormatter for Echo {
        fn format_amount(&self, amount: f64) -> String {
            format!("AMOUNT {amount}")
        }
    }

    #[test]
    fn custom_formatter_drives_the_pass() {
        let mut doc = markup::parse_html(r#"<b class="price" data-price="2.5">?</b>"#);
        let rewriter = PriceRewriter::new(Echo, RewriteSettings::default());
        let report = rewriter.convert_all_prices(&mut doc);
        assert_eq!(report.rewritten, 1);
        assert_eq!(markup::to_html(&doc), r#"<b class="price" data-price="2.5">AMOUNT 2.5</b>"#);
    }

    #[test]
    fn custom_marker_and_attribute() {
        let mut doc = markup::parse_html(
            r#"<i class="cost" data-eur="3">a</i><i class="price" data-price="4">b</i>"#,
        );
        let settings = RewriteSettings {
            marker_class: "cost".into(),
            price_attribute: "data-eur".into(),
            ..RewriteSettings::default()
        };
        let report = PriceRewriter::new(PriceFormatter::default(), settings)
            .convert_all_prices(&mut doc);
        assert_eq!(report.matched, 1);
        assert_eq!(
            markup::to_html(&doc),
            r#"<i class="cost" data-eur="3">3,00&nbsp;€</i><i class="price" data-price="4">b</i>"#
        );
    }

    #[test]
    fn report_counts_skipped_elements() {
        let mut doc = markup::parse_html(
            r#"<p class="price" data-price="x">keep</p><p class="price" data-price="1">y</p>"#,
        );
        let settings = RewriteSettings {
            invalid_policy: InvalidPricePolicy::Skip,
            ..RewriteSettings::default()
        };
        let report = PriceRewriter::new(PriceFormatter::default(), settings)
            .convert_all_prices(&mut doc);
        assert_eq!(report.matched, 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.invalid[0].raw.as_deref(), Some("x"));
    }
}
