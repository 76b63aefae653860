pub mod parse;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::PriceError;

pub use parse::{parse_float, parse_price};

/// Locale every price is rendered in.
pub const DEFAULT_LOCALE: &str = "de-DE";
/// Currency label attached to every rendered price.
pub const DEFAULT_CURRENCY: &str = "EUR";
pub const EURO_SYMBOL: char = '€';
/// Fraction digits of a rendered Euro amount.
pub const EURO_MINOR_UNITS: u8 = 2;

static DEFAULT_FORMATTER: Lazy<PriceFormatter> = Lazy::new(PriceFormatter::default);

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

/// Separators and symbol spacing of a locale's currency convention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    /// Placed between the amount and the trailing currency symbol.
    pub symbol_separator: char,
}

impl LocaleConfig {
    /// German conventions: `1.234,50 €` with a no-break space before the symbol.
    pub fn de_de() -> Self {
        Self {
            language_tag: DEFAULT_LOCALE.into(),
            decimal_separator: ',',
            grouping_separator: '.',
            symbol_separator: '\u{a0}',
        }
    }

    /// Resolves a BCP 47 tag to a known convention. Only German is supported.
    pub fn resolve(tag: &str) -> Option<Self> {
        let normalized = tag.trim().replace('_', "-");
        if normalized.eq_ignore_ascii_case(DEFAULT_LOCALE) {
            Some(Self::de_de())
        } else {
            None
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::de_de()
    }
}

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter {
    fn format_amount(&self, amount: f64) -> String;
}

/// Renders prices under one locale/currency pair fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormatter {
    locale: LocaleConfig,
    currency: CurrencyCode,
}

impl PriceFormatter {
    pub fn new(locale: &str, currency: &str) -> Result<Self, PriceError> {
        let unsupported = || PriceError::UnsupportedLocale {
            locale: locale.to_string(),
            currency: currency.to_string(),
        };
        let locale_config = LocaleConfig::resolve(locale).ok_or_else(unsupported)?;
        let code = CurrencyCode::new(currency.trim());
        if code.as_str() != DEFAULT_CURRENCY {
            return Err(unsupported());
        }
        Ok(Self {
            locale: locale_config,
            currency: code,
        })
    }

    pub fn locale(&self) -> &LocaleConfig {
        &self.locale
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn format(&self, price: f64) -> String {
        format_currency_value(price, &self.locale)
    }
}

impl Default for PriceFormatter {
    fn default() -> Self {
        Self {
            locale: LocaleConfig::de_de(),
            currency: CurrencyCode::default(),
        }
    }
}

impl CurrencyFormatter for PriceFormatter {
    fn format_amount(&self, amount: f64) -> String {
        self.format(amount)
    }
}

/// Formats `price` as a German Euro amount, e.g. `1.234,50 €`.
pub fn format_eur(price: f64) -> String {
    DEFAULT_FORMATTER.format(price)
}

/// Renders the magnitude of a finite `value` with exactly `precision` fraction digits.
///
/// The value is rounded from its shortest round-trip decimal form, ties away
/// from zero, so `1.005` renders as `1,01` rather than following the binary
/// expansion.
pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let shortest = value.abs().to_string();
    let (int_part, frac_part) = round_half_expand(&shortest, precision as usize);
    let mut body = group_digits(&int_part, locale.grouping_separator);
    if !frac_part.is_empty() {
        body.push(locale.decimal_separator);
        body.push_str(&frac_part);
    }
    body
}

fn round_half_expand(repr: &str, precision: usize) -> (String, String) {
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr, ""));
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(precision))
        .map(|b| b - b'0')
        .collect();

    let round_up = frac_part
        .as_bytes()
        .get(precision)
        .is_some_and(|digit| *digit >= b'5');
    if round_up {
        let mut idx = digits.len();
        loop {
            if idx == 0 {
                digits.insert(0, 1);
                break;
            }
            idx -= 1;
            if digits[idx] == 9 {
                digits[idx] = 0;
            } else {
                digits[idx] += 1;
                break;
            }
        }
    }

    let split = digits.len() - precision;
    let render = |slice: &[u8]| -> String { slice.iter().map(|d| char::from(b'0' + d)).collect() };
    (render(&digits[..split]), render(&digits[split..]))
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().enumerate() {
        if count != 0 && (digits.len() - count) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders `amount` with the locale's separators and a trailing currency symbol.
///
/// Non-finite input is not rejected: NaN renders as `NaN €` and infinities as `∞ €`.
pub fn format_currency_value(amount: f64, locale: &LocaleConfig) -> String {
    let body = if amount.is_nan() {
        "NaN".to_string()
    } else if amount.is_infinite() {
        "∞".to_string()
    } else {
        format_number(locale, amount, EURO_MINOR_UNITS)
    };
    let sign = if amount.is_sign_negative() && !amount.is_nan() {
        "-"
    } else {
        ""
    };
    format!("{sign}{body}{}{EURO_SYMBOL}", locale.symbol_separator)
}
