//! The three-stage validation pipeline.
//!
//! Stage 1 checks structural presence, stage 2 cross-checks the declared
//! monetary totals, stage 3 applies the shared EN 16931 rule set plus the
//! target format's profile rules. Findings accumulate across stages — a
//! stage-1 failure does not suppress stage 2. The single structurally
//! fatal condition (no line items) short-circuits the whole pipeline
//! with one finding.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::breakdown::{self, line_category};
use super::error::{Severity, ValidationFinding};
use super::money;
use super::types::*;
use super::{countries, currencies, units};

/// Aggregate status of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// No findings at all.
    Valid,
    /// Warnings only — emission proceeds.
    Warnings,
    /// At least one error — emission is blocked.
    Invalid,
}

/// Ordered, append-only list of findings from one pipeline run.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub findings: Vec<ValidationFinding>,
}

impl ValidationReport {
    pub fn status(&self) -> ValidationStatus {
        if self.findings.iter().any(|f| f.severity == Severity::Error) {
            ValidationStatus::Invalid
        } else if self.findings.is_empty() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Warnings
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }
}

/// Run the full pipeline with a format profile layered on the base rules.
pub fn validate_with_profile<F>(invoice: &Invoice, profile: F) -> ValidationReport
where
    F: Fn(&Invoice) -> Vec<ValidationFinding>,
{
    let mut findings = Vec::new();

    // Structurally fatal: nothing downstream can be checked sensibly.
    if invoice.lines.is_empty() {
        findings.push(ValidationFinding::error(
            "BR-16",
            "lines",
            "invoice must have at least one line item",
        ));
        return ValidationReport { findings };
    }

    findings.extend(validate_schema(invoice));
    findings.extend(validate_monetary(invoice));
    findings.extend(validate_en16931(invoice));
    findings.extend(profile(invoice));

    ValidationReport { findings }
}

/// Stage 1 — presence and identity checks.
pub fn validate_schema(invoice: &Invoice) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    if invoice.number.trim().is_empty() {
        findings.push(ValidationFinding::error(
            "BR-02",
            "number",
            "invoice number must not be empty",
        ));
    }

    if invoice.seller.name.trim().is_empty() {
        findings.push(ValidationFinding::error(
            "BR-06",
            "seller.name",
            "seller name must not be empty",
        ));
    }

    if invoice.buyer.name.trim().is_empty() {
        findings.push(ValidationFinding::error(
            "BR-07",
            "buyer.name",
            "buyer name must not be empty",
        ));
    }

    // Credit notes legitimately carry a negative or zero total.
    if invoice.type_code != InvoiceTypeCode::CreditNote
        && invoice.totals.gross_total <= Decimal::ZERO
    {
        findings.push(
            ValidationFinding::error(
                "EF-01",
                "totals.gross_total",
                "invoice total must be positive",
            )
            .with_values("> 0", invoice.totals.gross_total),
        );
    }

    if invoice.type_code == InvoiceTypeCode::CreditNote && invoice.preceding_invoice.is_none() {
        findings.push(ValidationFinding::error(
            "BR-55",
            "preceding_invoice",
            "credit note (381) requires a preceding invoice reference",
        ));
    }

    findings
}

/// VAT rates tried by gross-pricing detection, most common first.
const GROSS_DETECTION_RATES: [u32; 6] = [19, 7, 20, 21, 10, 5];

/// Tolerance for the gross-division probe — wider than reconciliation
/// because the division compounds the rounding of every line.
fn gross_detection_tolerance() -> Decimal {
    dec!(0.05)
}

/// Stage 2 — monetary cross-checks.
///
/// When the net-basis reconciliation fails, the stage probes common VAT
/// rates to detect gross-priced line items. A detected gross-priced
/// invoice is only checked for internal consistency (net + tax ≈ gross)
/// instead of recomputing tax groups from now-gross line totals, which
/// would produce false positives on legitimately gross-priced invoices.
pub fn validate_monetary(invoice: &Invoice) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    let tol = money::reconciliation_tolerance();
    let totals = &invoice.totals;

    // Line-level: declared line total vs quantity × unit price.
    for (i, line) in invoice.lines.iter().enumerate() {
        let expected = money::scale(line.unit_price, line.quantity);
        if !money::approx_eq(line.line_total, expected, tol) {
            findings.push(
                ValidationFinding::error(
                    "EF-02",
                    format!("lines[{i}].line_total"),
                    "line total does not match quantity × unit price",
                )
                .with_values(expected, line.line_total),
            );
        }
    }

    // (a) Net-basis reconciliation: Σ lines − allowances + charges.
    let line_sum = money::sum(invoice.lines.iter().map(|l| l.line_total));
    let allowances = money::sum(
        invoice
            .allowance_charges
            .iter()
            .filter(|ac| !ac.is_charge)
            .map(|ac| ac.amount),
    );
    let charges = money::sum(
        invoice
            .allowance_charges
            .iter()
            .filter(|ac| ac.is_charge)
            .map(|ac| ac.amount),
    );
    let basis = money::add(money::sub(line_sum, allowances), charges);

    let net_reconciles = money::approx_eq(basis, totals.net_total, tol);
    let mut gross_priced = false;

    if !net_reconciles {
        // (b) Gross-pricing detection.
        if let Some(rate) = detect_gross_rate(basis, totals.net_total) {
            gross_priced = true;

            let mut rates: Vec<Decimal> = invoice.lines.iter().map(|l| l.tax_rate).collect();
            rates.sort();
            rates.dedup();
            if rates.len() > 1 {
                findings.push(ValidationFinding::error(
                    "EF-03",
                    "lines",
                    format!(
                        "gross-priced invoice with {} distinct tax rates is not supported \
                         (detected gross pricing at {rate}%)",
                        rates.len()
                    ),
                ));
            }
        } else {
            findings.push(
                ValidationFinding::error(
                    "BR-CO-13",
                    "totals.net_total",
                    "sum of line totals (± allowances/charges) does not match declared net total",
                )
                .with_values(basis, totals.net_total),
            );
        }
    }

    // (c) Per-rate-group reconciliation — skipped for gross-priced
    // invoices, whose line totals are not a net basis.
    if !gross_priced {
        for group in breakdown::tax_breakdown(invoice) {
            let per_line_tax = money::sum(
                invoice
                    .lines
                    .iter()
                    .filter(|l| line_category(l) == group.category && l.tax_rate == group.rate)
                    .map(|l| money::tax(l.line_total, l.tax_rate)),
            );
            // Allowance/charge groups have no line share; only compare
            // when lines contribute to the group.
            if per_line_tax != Decimal::ZERO
                && !money::approx_eq(group.tax_amount, per_line_tax, tol)
            {
                findings.push(
                    ValidationFinding::warning(
                        "BR-CO-17",
                        format!("tax_breakdown[{}%]", group.rate),
                        "per-line tax rounding deviates from the group basis computation",
                    )
                    .with_values(group.tax_amount, per_line_tax),
                );
            }
        }

        let breakdown_tax =
            money::sum(breakdown::tax_breakdown(invoice).iter().map(|b| b.tax_amount));
        if !money::approx_eq(breakdown_tax, totals.tax_total, tol) {
            findings.push(
                ValidationFinding::error(
                    "BR-CO-14",
                    "totals.tax_total",
                    "sum of tax group amounts does not match declared tax total",
                )
                .with_values(breakdown_tax, totals.tax_total),
            );
        }
    }

    // (d) Internal consistency: net + tax = gross. Checked for every
    // invoice, gross-priced or not.
    let expected_gross = money::add(totals.net_total, totals.tax_total);
    if !money::approx_eq(expected_gross, totals.gross_total, tol) {
        findings.push(
            ValidationFinding::error(
                "BR-CO-15",
                "totals.gross_total",
                "net total + tax total does not match declared gross total",
            )
            .with_values(expected_gross, totals.gross_total),
        );
    }

    findings
}

/// Probe the common VAT rates: does `gross ÷ (1 + rate)` land on the
/// declared net? Returns the first matching rate.
fn detect_gross_rate(gross_basis: Decimal, declared_net: Decimal) -> Option<u32> {
    GROSS_DETECTION_RATES.iter().copied().find(|&rate| {
        let divisor = Decimal::ONE + Decimal::from(rate) / dec!(100);
        let implied_net = money::round_half_up(gross_basis / divisor);
        money::approx_eq(implied_net, declared_net, gross_detection_tolerance())
    })
}

/// Stage 3 base — the pan-European EN 16931 rule set every profile
/// extends.
pub fn validate_en16931(invoice: &Invoice) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    // BR-05: currency code.
    if invoice.currency_code.len() != 3 {
        findings.push(
            ValidationFinding::error(
                "BR-05",
                "currency_code",
                "currency code must be 3 characters (ISO 4217)",
            )
            .with_values("3 characters", &invoice.currency_code),
        );
    } else if !currencies::is_allowed_currency(&invoice.currency_code) {
        findings.push(ValidationFinding::warning(
            "BR-05",
            "currency_code",
            format!(
                "currency code '{}' is not on the allow-list",
                invoice.currency_code
            ),
        ));
    }

    validate_address(&invoice.seller.address, "seller.address", "BR-11", &mut findings);
    validate_address(&invoice.buyer.address, "buyer.address", "BR-12", &mut findings);

    // BR-CO-26: seller should carry a registered identifier.
    if invoice.seller.vat_id.is_none() && invoice.seller.tax_number.is_none() {
        findings.push(ValidationFinding::warning(
            "BR-CO-26",
            "seller",
            "seller has neither a VAT identifier nor a tax number; \
             falling back to the trading name as legal identifier",
        ));
    }

    for (prefix, vat_id) in [
        ("seller.vat_id", &invoice.seller.vat_id),
        ("buyer.vat_id", &invoice.buyer.vat_id),
    ] {
        if let Some(vat_id) = vat_id {
            validate_vat_id(vat_id, prefix, &mut findings);
        }
    }

    // BR-CO-04: line identifiers must be unique.
    let mut seen = std::collections::HashSet::new();
    for (i, line) in invoice.lines.iter().enumerate() {
        if !seen.insert(&line.id) {
            findings.push(ValidationFinding::error(
                "BR-CO-04",
                format!("lines[{i}].id"),
                format!("duplicate line identifier '{}'", line.id),
            ));
        }
    }

    for (i, line) in invoice.lines.iter().enumerate() {
        validate_line(line, i, &mut findings);
    }

    for (i, ac) in invoice.allowance_charges.iter().enumerate() {
        let kind = if ac.is_charge { "charge" } else { "allowance" };
        if ac.amount.is_sign_negative() {
            findings.push(ValidationFinding::error(
                "BR-CO-18",
                format!("allowance_charges[{i}].amount"),
                format!("{kind} amount must not be negative"),
            ));
        }
        // EF-04: a percentage is only meaningful against a base amount.
        if ac.percentage.is_some() && ac.base_amount.is_none() {
            findings.push(ValidationFinding::error(
                "EF-04",
                format!("allowance_charges[{i}]"),
                format!("{kind} percentage requires a base amount"),
            ));
        }
        if let (Some(pct), Some(base)) = (ac.percentage, ac.base_amount) {
            let expected = money::tax(base, pct);
            if !money::approx_eq(expected, ac.amount, money::reconciliation_tolerance()) {
                findings.push(
                    ValidationFinding::warning(
                        "EF-04",
                        format!("allowance_charges[{i}].amount"),
                        format!("{kind} amount does not match percentage × base amount"),
                    )
                    .with_values(expected, ac.amount),
                );
            }
        }
    }

    // EF-05: payment means code allow-list.
    if let Some(payment) = &invoice.payment {
        if !payment.means_code.is_allowed() {
            findings.push(
                ValidationFinding::error(
                    "EF-05",
                    "payment.means_code",
                    "payment means code is not on the allow-list",
                )
                .with_values("10|30|48|49|57|58|59|97", payment.means_code.code()),
            );
        }
    }

    // BR-DEC-01: declared amounts carry at most 2 decimal places.
    for (field, value) in [
        ("totals.net_total", invoice.totals.net_total),
        ("totals.tax_total", invoice.totals.tax_total),
        ("totals.gross_total", invoice.totals.gross_total),
    ] {
        if value != value.round_dp(2) {
            findings.push(ValidationFinding::error(
                "BR-DEC-01",
                field,
                format!("amount {value} has more than 2 decimal places"),
            ));
        }
    }

    // Billing period must not be inverted.
    if let Some(period) = &invoice.billing_period {
        if period.end < period.start {
            findings.push(ValidationFinding::error(
                "BR-29",
                "billing_period",
                "billing period end date precedes the start date",
            ));
        }
    }

    findings
}

fn validate_address(
    address: &Address,
    prefix: &str,
    country_rule: &str,
    findings: &mut Vec<ValidationFinding>,
) {
    for (component, value) in [
        ("street", &address.street),
        ("city", &address.city),
        ("postal_code", &address.postal_code),
    ] {
        if value.trim().is_empty() {
            findings.push(ValidationFinding::error(
                "BR-09",
                format!("{prefix}.{component}"),
                format!("{component} must not be empty"),
            ));
        }
    }

    if address.country_code.len() != 2 || !countries::is_known_country(&address.country_code) {
        findings.push(
            ValidationFinding::error(
                country_rule,
                format!("{prefix}.country_code"),
                "country code is not a known ISO 3166-1 alpha-2 code",
            )
            .with_values("ISO 3166-1 alpha-2", &address.country_code),
        );
    }
}

fn validate_vat_id(vat_id: &str, field: &str, findings: &mut Vec<ValidationFinding>) {
    let mut chars = vat_id.chars();
    let prefix_ok = vat_id.len() >= 4
        && matches!(
            (chars.next(), chars.next()),
            (Some(a), Some(b)) if a.is_ascii_uppercase() && b.is_ascii_uppercase()
        )
        && chars.any(|c| c.is_ascii_alphanumeric());
    if !prefix_ok {
        findings.push(
            ValidationFinding::error(
                "BR-CO-09",
                field,
                "VAT identifier must start with a 2-letter country prefix followed by digits",
            )
            .with_values("e.g. DE123456789", vat_id),
        );
    }
}

fn validate_line(line: &LineItem, index: usize, findings: &mut Vec<ValidationFinding>) {
    let prefix = format!("lines[{index}]");

    if line.id.trim().is_empty() {
        findings.push(ValidationFinding::error(
            "BR-21",
            format!("{prefix}.id"),
            "line identifier must not be empty",
        ));
    }

    if line.name.trim().is_empty() {
        findings.push(ValidationFinding::error(
            "BR-25",
            format!("{prefix}.name"),
            "item name must not be empty",
        ));
    }

    if line.quantity.is_zero() {
        findings.push(ValidationFinding::error(
            "BR-22",
            format!("{prefix}.quantity"),
            "invoiced quantity must not be zero",
        ));
    }

    if line.unit_price.is_sign_negative() {
        findings.push(ValidationFinding::error(
            "BR-27",
            format!("{prefix}.unit_price"),
            "item net price must not be negative",
        ));
    }

    if line.unit.trim().is_empty() {
        findings.push(ValidationFinding::error(
            "BR-26",
            format!("{prefix}.unit"),
            "unit of measure must not be empty",
        ));
    } else if !units::is_known_unit(&line.unit) {
        findings.push(ValidationFinding::warning(
            "BR-26",
            format!("{prefix}.unit"),
            format!("unit code '{}' is not a known Rec 20 code", line.unit),
        ));
    }

    if line.tax_rate.is_sign_negative() {
        findings.push(ValidationFinding::error(
            "BR-27",
            format!("{prefix}.tax_rate"),
            "tax rate must not be negative",
        ));
    }

    // Category/rate coherence.
    match line_category(line) {
        TaxCategory::StandardRate => {
            if line.tax_rate.is_zero() {
                findings.push(ValidationFinding::error(
                    "BR-S-05",
                    format!("{prefix}.tax_rate"),
                    "standard-rate category requires a non-zero tax rate",
                ));
            }
        }
        cat @ (TaxCategory::ZeroRated
        | TaxCategory::Exempt
        | TaxCategory::ReverseCharge
        | TaxCategory::IntraCommunitySupply
        | TaxCategory::Export
        | TaxCategory::NotSubjectToVat) => {
            if !line.tax_rate.is_zero() {
                let rule = match cat {
                    TaxCategory::ZeroRated => "BR-Z-05",
                    TaxCategory::Exempt => "BR-E-05",
                    TaxCategory::ReverseCharge => "BR-AE-05",
                    TaxCategory::IntraCommunitySupply => "BR-IC-05",
                    TaxCategory::Export => "BR-G-05",
                    _ => "BR-O-05",
                };
                findings.push(ValidationFinding::error(
                    rule,
                    format!("{prefix}.tax_rate"),
                    format!("tax rate must be 0 for category {}", cat.code()),
                ));
            }
        }
        TaxCategory::CanaryIslands => {}
    }
}
