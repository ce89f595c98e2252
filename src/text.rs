//! Input normalization for amounts and card-statement descriptions.

use crate::models::ExpenseGroup;
use once_cell::sync::Lazy;
use regex::Regex;

static INSTALLMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[\s-]*(?:PARCELA)?\s*\(?(\d+)\s*(?:/|DE|-)\s*(\d+)\)?")
        .expect("installment pattern")
});

static PROCESSOR_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(PAG\s*\*|PG\s*\*|PAYPAL\s*\*|EBANX\s*\*|SHOPEE\s*\*|MERCADOPAGO\s*\*|MP\s*\*|APP\s*\*|GOOGLE\s*\*|APPLE\s*\*|EBN\s*\*|UBER UBER\s*\*|UBER\s*\*|99APP\s*\*|DL\s*\*|IOF\s*\*|AMAZON\s*\*|IFD\s*\*|IFOOD\s*\*|SERVICOS CLA\s*\*)\s*",
    )
    .expect("prefix pattern")
});

static LEADING_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\*\-\s\.]+").expect("punctuation pattern"));

static TRAILING_LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s(SAO PAULO|RIO DE JANEIRO|BR|BRA)$").expect("location pattern")
});

const GROUP_KEYWORDS: &[(ExpenseGroup, &[&str])] = &[
    (
        ExpenseGroup::Transport,
        &["UBER", "99APP", "POSTO", "IPIRANGA", "SHELL", "ESTACIONAMENTO"],
    ),
    (
        ExpenseGroup::Food,
        &[
            "IFOOD", "RAPPI", "RESTAURANTE", "PADARIA", "MERCADO", "SUPERMERCADO", "ASSAI",
            "ATACADISTA", "BURGER", "MC DONALDS", "LANCHE", "AÇAI", "PIZZARIA",
        ],
    ),
    (
        ExpenseGroup::Services,
        &["NETFLIX", "SPOTIFY", "AMAZON PRIME", "HBO", "DISNEY", "GOOGLE", "APPLE", "AWS"],
    ),
    (
        ExpenseGroup::Shopping,
        &["SHOPEE", "MERCADOLIVRE", "AMAZON", "MAGALU", "SHEIN", "ALIEXPRESS"],
    ),
    (
        ExpenseGroup::Health,
        &["FARMACIA", "DROGARIA", "CONSULTA", "EXAME", "MEDICO", "HOSPITAL", "ODONTO"],
    ),
    (
        ExpenseGroup::Home,
        &["LEROY", "C&C", "TOKSTOK", "MOBLY", "IKEA", "CONSTRUCAO"],
    ),
];

/// Parses a user-typed decimal. Accepts `12.5`, `12,5` and `1.234,50`.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let normalized = if compact.contains(',') {
        compact.replace('.', "").replace(',', ".")
    } else {
        compact
    };
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Like [`parse_decimal`], but unparseable input counts as zero.
pub fn parse_amount(raw: &str) -> f64 {
    parse_decimal(raw).unwrap_or(0.0)
}

/// Splits an installment marker off a description.
///
/// Returns the remaining text, the current installment and the total.
pub fn split_installments(description: &str) -> (String, u32, u32) {
    let Some(captures) = INSTALLMENT.captures(description) else {
        return (description.trim().to_string(), 1, 1);
    };
    let current = captures[1].parse::<u32>().unwrap_or(1).max(1);
    let total = captures[2].parse::<u32>().unwrap_or(1).max(1);
    let stripped = INSTALLMENT.replace_all(description, "");
    (stripped.trim().to_string(), current, total)
}

pub fn clean_merchant_name(raw: &str) -> String {
    let name = PROCESSOR_PREFIX.replace(raw, "");
    let name = LEADING_PUNCTUATION.replace(&name, "");
    let name = TRAILING_LOCATION.replace(&name, "");
    title_case(name.trim())
}

pub fn classify_group(name: &str) -> ExpenseGroup {
    let upper = name.to_uppercase();
    GROUP_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| upper.contains(keyword)))
        .map(|(group, _)| *group)
        .unwrap_or(ExpenseGroup::Other)
}

fn title_case(raw: &str) -> String {
    let mut titled = String::with_capacity(raw.len());
    let mut previous_cased = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if previous_cased {
                titled.extend(ch.to_lowercase());
            } else {
                titled.extend(ch.to_uppercase());
            }
            previous_cased = true;
        } else {
            titled.push(ch);
            previous_cased = false;
        }
    }
    titled
}
