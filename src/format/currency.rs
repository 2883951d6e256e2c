// Price formatting.
// Converts USD base prices into the currency implied by the UI language.

/// Shown when there is no price to display.
pub const NO_PRICE: &str = "-";

/// A display currency with a fixed rate against USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub usd_rate: f64,
    pub decimals: usize,
}

pub const USD: Currency = Currency {
    code: "USD",
    symbol: "$",
    usd_rate: 1.0,
    decimals: 2,
};

pub const TRY: Currency = Currency {
    code: "TRY",
    symbol: "₺",
    usd_rate: 34.0,
    decimals: 2,
};

pub const JPY: Currency = Currency {
    code: "JPY",
    symbol: "¥",
    usd_rate: 150.0,
    decimals: 0,
};

/// Currency for a language code; unknown languages use USD.
pub fn currency_for(language: &str) -> Currency {
    match language {
        "tr" => TRY,
        "ja" => JPY,
        _ => USD,
    }
}

impl Currency {
    pub fn convert(&self, usd: f64) -> f64 {
        usd * self.usd_rate
    }

    /// Whole-unit currencies round half away from zero.
    pub fn format(&self, usd: f64) -> String {
        let amount = self.convert(usd);
        if self.decimals == 0 {
            format!("{}{:.0}", self.symbol, amount.round())
        } else {
            format!("{}{:.*}", self.symbol, self.decimals, amount)
        }
    }
}

/// Format a USD amount for `language`, or `-` when missing.
pub fn format_price(usd: Option<f64>, language: &str) -> String {
    match usd {
        Some(amount) if amount.is_finite() => currency_for(language).format(amount),
        _ => NO_PRICE.to_string(),
    }
}
