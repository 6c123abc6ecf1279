use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::breakdown;
use super::money;
use super::types::*;

/// Fluent builder for the canonical invoice.
///
/// When the caller does not declare totals, `build()` derives them from
/// the lines and allowances/charges through the monetary kernel, so a
/// builder-produced invoice always reconciles.
///
/// ```
/// use chrono::NaiveDate;
/// use efaktura::core::*;
/// use rust_decimal_macros::dec;
///
/// let invoice = InvoiceBuilder::new("INV-001", NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
///     .seller(PartyBuilder::new("Seller GmbH", "Hauptstr. 1", "Berlin", "10115", "DE")
///         .vat_id("DE123456789")
///         .build())
///     .buyer(PartyBuilder::new("Buyer AG", "Marienplatz 1", "München", "80331", "DE").build())
///     .add_line(LineItemBuilder::new("1", "Service", dec!(1), "C62", dec!(100))
///         .tax_rate(dec!(19))
///         .build())
///     .build();
///
/// assert_eq!(invoice.totals.gross_total, dec!(119.00));
/// ```
pub struct InvoiceBuilder {
    number: String,
    issue_date: NaiveDate,
    due_date: Option<NaiveDate>,
    type_code: InvoiceTypeCode,
    currency_code: String,
    notes: Vec<String>,
    buyer_reference: Option<String>,
    order_reference: Option<String>,
    seller: Option<Party>,
    buyer: Option<Party>,
    lines: Vec<LineItem>,
    allowance_charges: Vec<AllowanceCharge>,
    totals: Option<Totals>,
    payment_terms: Option<String>,
    payment: Option<PaymentInstructions>,
    billing_period: Option<Period>,
    preceding_invoice: Option<PrecedingInvoice>,
}

impl InvoiceBuilder {
    pub fn new(number: impl Into<String>, issue_date: NaiveDate) -> Self {
        Self {
            number: number.into(),
            issue_date,
            due_date: None,
            type_code: InvoiceTypeCode::Invoice,
            currency_code: "EUR".to_string(),
            notes: Vec::new(),
            buyer_reference: None,
            order_reference: None,
            seller: None,
            buyer: None,
            lines: Vec::new(),
            allowance_charges: Vec::new(),
            totals: None,
            payment_terms: None,
            payment: None,
            billing_period: None,
            preceding_invoice: None,
        }
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn type_code(mut self, code: InvoiceTypeCode) -> Self {
        self.type_code = code;
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn buyer_reference(mut self, reference: impl Into<String>) -> Self {
        self.buyer_reference = Some(reference.into());
        self
    }

    pub fn order_reference(mut self, reference: impl Into<String>) -> Self {
        self.order_reference = Some(reference.into());
        self
    }

    pub fn seller(mut self, party: Party) -> Self {
        self.seller = Some(party);
        self
    }

    pub fn buyer(mut self, party: Party) -> Self {
        self.buyer = Some(party);
        self
    }

    pub fn add_line(mut self, line: LineItem) -> Self {
        self.lines.push(line);
        self
    }

    pub fn add_allowance_charge(mut self, ac: AllowanceCharge) -> Self {
        self.allowance_charges.push(ac);
        self
    }

    /// Declare totals explicitly instead of deriving them.
    pub fn totals(mut self, net: Decimal, tax: Decimal, gross: Decimal) -> Self {
        self.totals = Some(Totals {
            net_total: net,
            tax_total: tax,
            gross_total: gross,
        });
        self
    }

    pub fn payment_terms(mut self, terms: impl Into<String>) -> Self {
        self.payment_terms = Some(terms.into());
        self
    }

    pub fn payment(mut self, payment: PaymentInstructions) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn billing_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.billing_period = Some(Period { start, end });
        self
    }

    pub fn preceding_invoice(
        mut self,
        number: impl Into<String>,
        issue_date: Option<NaiveDate>,
    ) -> Self {
        self.preceding_invoice = Some(PrecedingInvoice {
            number: number.into(),
            issue_date,
        });
        self
    }

    pub fn build(self) -> Invoice {
        let mut invoice = Invoice {
            number: self.number,
            issue_date: self.issue_date,
            due_date: self.due_date,
            type_code: self.type_code,
            currency_code: self.currency_code,
            notes: self.notes,
            buyer_reference: self.buyer_reference,
            order_reference: self.order_reference,
            seller: self.seller.unwrap_or_else(placeholder_party),
            buyer: self.buyer.unwrap_or_else(placeholder_party),
            lines: self.lines,
            allowance_charges: self.allowance_charges,
            totals: Totals {
                net_total: Decimal::ZERO,
                tax_total: Decimal::ZERO,
                gross_total: Decimal::ZERO,
            },
            payment_terms: self.payment_terms,
            payment: self.payment,
            billing_period: self.billing_period,
            preceding_invoice: self.preceding_invoice,
        };

        invoice.totals = match self.totals {
            Some(declared) => declared,
            None => derive_totals(&invoice),
        };
        invoice
    }
}

/// Empty party — schema validation (BR-06/BR-07) will flag it if the
/// caller forgot to set one.
fn placeholder_party() -> Party {
    Party {
        name: String::new(),
        trading_name: None,
        vat_id: None,
        tax_number: None,
        address: Address {
            street: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country_code: String::new(),
        },
        electronic_address: None,
        contact: None,
    }
}

fn derive_totals(invoice: &Invoice) -> Totals {
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
    let net_total = money::add(money::sub(line_sum, allowances), charges);
    let tax_total = money::sum(breakdown::tax_breakdown(invoice).iter().map(|b| b.tax_amount));
    Totals {
        net_total,
        tax_total,
        gross_total: money::add(net_total, tax_total),
    }
}

/// Builder for a [`Party`]. The four address components are required up
/// front — no supported standard accepts a partial address.
pub struct PartyBuilder {
    party: Party,
}

impl PartyBuilder {
    pub fn new(
        name: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            party: Party {
                name: name.into(),
                trading_name: None,
                vat_id: None,
                tax_number: None,
                address: Address {
                    street: street.into(),
                    city: city.into(),
                    postal_code: postal_code.into(),
                    country_code: country_code.into(),
                },
                electronic_address: None,
                contact: None,
            },
        }
    }

    pub fn trading_name(mut self, name: impl Into<String>) -> Self {
        self.party.trading_name = Some(name.into());
        self
    }

    pub fn vat_id(mut self, vat_id: impl Into<String>) -> Self {
        self.party.vat_id = Some(vat_id.into());
        self
    }

    pub fn tax_number(mut self, tax_number: impl Into<String>) -> Self {
        self.party.tax_number = Some(tax_number.into());
        self
    }

    pub fn electronic_address(
        mut self,
        scheme: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.party.electronic_address = Some(ElectronicAddress {
            scheme: scheme.into(),
            value: value.into(),
        });
        self
    }

    pub fn contact(
        mut self,
        name: Option<String>,
        phone: Option<String>,
        email: Option<String>,
    ) -> Self {
        self.party.contact = Some(Contact { name, phone, email });
        self
    }

    pub fn build(self) -> Party {
        self.party
    }
}

/// Builder for a [`LineItem`]. The line total defaults to
/// quantity × unit price, rounded through the kernel.
pub struct LineItemBuilder {
    line: LineItem,
}

impl LineItemBuilder {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            line: LineItem {
                id: id.into(),
                name: name.into(),
                description: None,
                quantity,
                unit: unit.into(),
                unit_price,
                line_total: money::scale(unit_price, quantity),
                tax_rate: Decimal::ZERO,
                tax_category: None,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.line.description = Some(description.into());
        self
    }

    /// Set an explicit tax category and rate.
    pub fn tax(mut self, category: TaxCategory, rate: Decimal) -> Self {
        self.line.tax_category = Some(category);
        self.line.tax_rate = rate;
        self
    }

    /// Set only the rate; the category is derived when needed.
    pub fn tax_rate(mut self, rate: Decimal) -> Self {
        self.line.tax_rate = rate;
        self
    }

    /// Declare the line total instead of deriving it.
    pub fn line_total(mut self, total: Decimal) -> Self {
        self.line.line_total = total;
        self
    }

    pub fn build(self) -> LineItem {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn derives_line_total_from_quantity_and_price() {
        let line = LineItemBuilder::new("1", "Beratung", dec!(10), "HUR", dec!(150)).build();
        assert_eq!(line.line_total, dec!(1500.00));
    }

    #[test]
    fn derives_totals_from_lines() {
        let inv = InvoiceBuilder::new("INV-1", date())
            .seller(PartyBuilder::new("S", "Str. 1", "Berlin", "10115", "DE").build())
            .buyer(PartyBuilder::new("B", "Weg 2", "Hamburg", "20095", "DE").build())
            .add_line(
                LineItemBuilder::new("1", "Dev", dec!(80), "HUR", dec!(120))
                    .tax_rate(dec!(19))
                    .build(),
            )
            .add_line(
                LineItemBuilder::new("2", "Hosting", dec!(1), "C62", dec!(49.90))
                    .tax_rate(dec!(19))
                    .build(),
            )
            .build();

        assert_eq!(inv.totals.net_total, dec!(9649.90));
        assert_eq!(inv.totals.tax_total, dec!(1833.48));
        assert_eq!(inv.totals.gross_total, dec!(11483.38));
    }

    #[test]
    fn declared_totals_are_kept_verbatim() {
        let inv = InvoiceBuilder::new("INV-2", date())
            .add_line(
                LineItemBuilder::new("1", "X", dec!(1), "C62", dec!(100))
                    .tax_rate(dec!(19))
                    .build(),
            )
            .totals(dec!(100), dec!(19), dec!(119.50))
            .build();
        // Deliberately wrong gross — validation, not the builder, flags it.
        assert_eq!(inv.totals.gross_total, dec!(119.50));
    }

    #[test]
    fn allowances_reduce_derived_net() {
        let inv = InvoiceBuilder::new("INV-3", date())
            .add_line(
                LineItemBuilder::new("1", "X", dec!(1), "C62", dec!(100))
                    .tax_rate(dec!(19))
                    .build(),
            )
            .add_allowance_charge(AllowanceCharge {
                is_charge: false,
                amount: dec!(10),
                percentage: None,
                base_amount: None,
                tax_rate: Some(dec!(19)),
                tax_category: None,
                reason: None,
            })
            .build();
        assert_eq!(inv.totals.net_total, dec!(90.00));
        assert_eq!(inv.totals.tax_total, dec!(17.10));
        assert_eq!(inv.totals.gross_total, dec!(107.10));
    }
}
