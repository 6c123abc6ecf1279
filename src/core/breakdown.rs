//! Derived tax breakdown.
//!
//! One group per distinct (rate, category) over lines and document-level
//! allowances/charges. The breakdown is recomputed on every use so it can
//! never drift from its source data, and both the validation pipeline and
//! every generator obtain categories through [`effective_category`] —
//! the single place an implicit category is derived from a rate.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::money;
use super::types::{AllowanceCharge, Invoice, LineItem, TaxCategory};

/// BG-23: One tax group per (rate, category) combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBreakdown {
    /// BT-118: Tax category.
    pub category: TaxCategory,
    /// BT-119: Rate percentage.
    pub rate: Decimal,
    /// BT-116: Taxable basis (sum of line nets ± allowances/charges).
    pub taxable_amount: Decimal,
    /// BT-117: Tax amount = round(basis × rate / 100).
    pub tax_amount: Decimal,
    /// BT-120: Exemption reason, for zero-tax categories.
    pub exemption_reason: Option<&'static str>,
}

/// Resolve a line's tax category: an explicit value wins, otherwise the
/// category is derived from the rate (non-zero → standard, zero →
/// zero-rated).
pub fn effective_category(explicit: Option<TaxCategory>, rate: Decimal) -> TaxCategory {
    explicit.unwrap_or(if rate.is_zero() {
        TaxCategory::ZeroRated
    } else {
        TaxCategory::StandardRate
    })
}

/// Resolve the category of a line item.
pub fn line_category(line: &LineItem) -> TaxCategory {
    effective_category(line.tax_category, line.tax_rate)
}

/// Resolve the category of a document-level allowance/charge. Without an
/// explicit rate it falls into the zero-rate group.
pub fn allowance_category(ac: &AllowanceCharge) -> TaxCategory {
    effective_category(ac.tax_category, ac.tax_rate.unwrap_or(Decimal::ZERO))
}

/// Compute the tax breakdown for an invoice.
///
/// Bases are summed through the monetary kernel; groups are ordered by
/// descending rate (then category code) for deterministic output.
pub fn tax_breakdown(invoice: &Invoice) -> Vec<TaxBreakdown> {
    let mut groups: HashMap<(TaxCategory, Decimal), Vec<Decimal>> = HashMap::new();

    for line in &invoice.lines {
        groups
            .entry((line_category(line), line.tax_rate))
            .or_default()
            .push(line.line_total);
    }

    for ac in &invoice.allowance_charges {
        let rate = ac.tax_rate.unwrap_or(Decimal::ZERO);
        let signed = if ac.is_charge { ac.amount } else { -ac.amount };
        groups
            .entry((allowance_category(ac), rate))
            .or_default()
            .push(signed);
    }

    let mut breakdown: Vec<TaxBreakdown> = groups
        .into_iter()
        .map(|((category, rate), amounts)| {
            let taxable_amount = money::sum(amounts);
            TaxBreakdown {
                category,
                rate,
                taxable_amount,
                tax_amount: money::tax(taxable_amount, rate),
                exemption_reason: exemption_reason_for(category),
            }
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.rate
            .cmp(&a.rate)
            .then_with(|| a.category.code().cmp(b.category.code()))
    });
    breakdown
}

/// Standard exemption reason text per zero-tax category (BT-120).
fn exemption_reason_for(category: TaxCategory) -> Option<&'static str> {
    match category {
        TaxCategory::Exempt => Some("Exempt from tax"),
        TaxCategory::ReverseCharge => Some("Reverse charge"),
        TaxCategory::IntraCommunitySupply => Some("Intra-community supply"),
        TaxCategory::Export => Some("Export outside the EU"),
        TaxCategory::NotSubjectToVat => Some("Not subject to VAT"),
        _ => None,
    }
}
