use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The canonical invoice — the single normalized representation every
/// validation stage and format generator consumes.
///
/// Field names follow the EN 16931 semantic model (BT/BG references in
/// the doc comments). Declared totals are carried as-is and cross-checked
/// by the validation pipeline; they are never trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// BT-1: Invoice number.
    pub number: String,
    /// BT-2: Issue date.
    pub issue_date: NaiveDate,
    /// BT-9: Payment due date.
    pub due_date: Option<NaiveDate>,
    /// BT-3: Invoice type code (UNTDID 1001).
    pub type_code: InvoiceTypeCode,
    /// BT-5: Invoice currency code (ISO 4217). One currency per invoice.
    pub currency_code: String,
    /// BT-22: Notes / free text.
    pub notes: Vec<String>,
    /// BT-10: Buyer reference (Leitweg-ID for XRechnung).
    pub buyer_reference: Option<String>,
    /// BT-13: Purchase order reference.
    pub order_reference: Option<String>,
    /// BG-4: Seller.
    pub seller: Party,
    /// BG-7: Buyer.
    pub buyer: Party,
    /// BG-25: Invoice lines.
    pub lines: Vec<LineItem>,
    /// BG-20/BG-21: Document-level allowances and charges.
    pub allowance_charges: Vec<AllowanceCharge>,
    /// BG-22: Declared document totals.
    pub totals: Totals,
    /// BT-20: Payment terms free text.
    pub payment_terms: Option<String>,
    /// BG-16: Payment instructions.
    pub payment: Option<PaymentInstructions>,
    /// BG-14: Billing period.
    pub billing_period: Option<Period>,
    /// BG-3: Preceding invoice reference. Required for credit notes.
    pub preceding_invoice: Option<PrecedingInvoice>,
}

/// BG-4 / BG-7: Party (seller or buyer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    /// BT-27 / BT-44: Name.
    pub name: String,
    /// BT-29 / BT-46: Trading name.
    pub trading_name: Option<String>,
    /// BT-31 / BT-48: VAT identifier (2-letter country prefix + digits).
    pub vat_id: Option<String>,
    /// BT-32: Local tax registration number.
    pub tax_number: Option<String>,
    /// BG-5 / BG-8: Postal address.
    pub address: Address,
    /// BT-34 / BT-49: Electronic address.
    pub electronic_address: Option<ElectronicAddress>,
    /// BG-6 / BG-9: Contact information.
    pub contact: Option<Contact>,
}

impl Party {
    /// Legal-identifier fallback chain: VAT id, else tax number, else
    /// trading name, else the party name. Some standards require that
    /// at least one legal identifier is always emitted.
    pub fn legal_identifier(&self) -> &str {
        self.vat_id
            .as_deref()
            .or(self.tax_number.as_deref())
            .or(self.trading_name.as_deref())
            .unwrap_or(&self.name)
    }
}

/// BG-5 / BG-8: Postal address. The four components are required
/// together — a partial address is worse than none for every supported
/// standard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// BT-35 / BT-50: Street and house number.
    pub street: String,
    /// BT-37 / BT-52: City.
    pub city: String,
    /// BT-38 / BT-53: Postal code.
    pub postal_code: String,
    /// BT-40 / BT-55: Country code (ISO 3166-1 alpha-2).
    pub country_code: String,
}

/// BG-6 / BG-9: Contact triple. XRechnung requires all three for the
/// seller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// BT-41 / BT-56: Contact point name.
    pub name: Option<String>,
    /// BT-42 / BT-57: Telephone.
    pub phone: Option<String>,
    /// BT-43 / BT-58: Email.
    pub email: Option<String>,
}

/// Electronic address with scheme identifier ('EM' for email, 4-digit
/// EAS codes for participant ids).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectronicAddress {
    pub scheme: String,
    pub value: String,
}

/// BG-25: Invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// BT-126: Line identifier.
    pub id: String,
    /// BT-153: Item name.
    pub name: String,
    /// BT-154: Item description.
    pub description: Option<String>,
    /// BT-129: Invoiced quantity.
    pub quantity: Decimal,
    /// BT-130: Unit of measure (UN/CEFACT Rec 20, e.g. "C62", "HUR", "KGM").
    pub unit: String,
    /// BT-146: Item net price per unit.
    pub unit_price: Decimal,
    /// BT-131: Declared line net amount. Cross-checked against
    /// quantity × unit_price.
    pub line_total: Decimal,
    /// BT-152: Tax rate percentage.
    pub tax_rate: Decimal,
    /// BT-151: Explicit tax category. When absent, the category is
    /// derived from the rate (see `core::breakdown::effective_category`).
    pub tax_category: Option<TaxCategory>,
}

/// UNTDID 5305 — tax category codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    /// S — Standard rate.
    StandardRate,
    /// Z — Zero rated.
    ZeroRated,
    /// E — Exempt from tax.
    Exempt,
    /// AE — Reverse charge.
    ReverseCharge,
    /// K — Intra-community supply.
    IntraCommunitySupply,
    /// G — Export outside the EU.
    Export,
    /// O — Not subject to VAT.
    NotSubjectToVat,
    /// L — Canary Islands general indirect tax (IGIC).
    CanaryIslands,
}

impl TaxCategory {
    /// UNTDID 5305 code letter.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StandardRate => "S",
            Self::ZeroRated => "Z",
            Self::Exempt => "E",
            Self::ReverseCharge => "AE",
            Self::IntraCommunitySupply => "K",
            Self::Export => "G",
            Self::NotSubjectToVat => "O",
            Self::CanaryIslands => "L",
        }
    }

    /// Parse from UNTDID 5305 code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::StandardRate),
            "Z" => Some(Self::ZeroRated),
            "E" => Some(Self::Exempt),
            "AE" => Some(Self::ReverseCharge),
            "K" => Some(Self::IntraCommunitySupply),
            "G" => Some(Self::Export),
            "O" => Some(Self::NotSubjectToVat),
            "L" => Some(Self::CanaryIslands),
            _ => None,
        }
    }
}

/// UNTDID 1001 — the invoice type codes the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceTypeCode {
    /// 380 — Commercial invoice.
    Invoice,
    /// 381 — Credit note.
    CreditNote,
    /// 384 — Corrected invoice.
    Corrected,
    /// 389 — Self-billed invoice.
    SelfBilled,
}

impl InvoiceTypeCode {
    /// UNTDID 1001 numeric code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Invoice => 380,
            Self::CreditNote => 381,
            Self::Corrected => 384,
            Self::SelfBilled => 389,
        }
    }

    /// Parse from UNTDID 1001 numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            380 => Some(Self::Invoice),
            381 => Some(Self::CreditNote),
            384 => Some(Self::Corrected),
            389 => Some(Self::SelfBilled),
            _ => None,
        }
    }
}

/// BG-20 / BG-21: Document-level allowance or charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowanceCharge {
    /// False = allowance (discount), true = charge (surcharge).
    pub is_charge: bool,
    /// BT-92 / BT-99: Amount.
    pub amount: Decimal,
    /// BT-94 / BT-101: Percentage, when percentage-based.
    pub percentage: Option<Decimal>,
    /// BT-93 / BT-100: Base amount the percentage applies to. Must be
    /// present when a percentage is.
    pub base_amount: Option<Decimal>,
    /// BT-96 / BT-103: Tax rate.
    pub tax_rate: Option<Decimal>,
    /// BT-95 / BT-102: Tax category.
    pub tax_category: Option<TaxCategory>,
    /// BT-97 / BT-104: Reason text.
    pub reason: Option<String>,
}

/// BG-22: Declared document totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Totals {
    /// BT-109: Total without tax.
    pub net_total: Decimal,
    /// BT-110: Total tax amount.
    pub tax_total: Decimal,
    /// BT-112: Total with tax.
    pub gross_total: Decimal,
}

/// BG-16: Payment instructions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInstructions {
    /// BT-81: Payment means type code (UNTDID 4461).
    pub means_code: PaymentMeansCode,
    /// BT-83: Remittance information.
    pub remittance_info: Option<String>,
    /// BG-17: Credit transfer account.
    pub credit_transfer: Option<CreditTransfer>,
}

/// BG-17: Credit transfer / bank account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTransfer {
    /// BT-84: IBAN.
    pub iban: String,
    /// BT-86: BIC.
    pub bic: Option<String>,
    /// BT-85: Account name.
    pub account_name: Option<String>,
}

/// UNTDID 4461 payment means codes on the engine's allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMeansCode {
    /// 10 — Cash.
    Cash,
    /// 30 — Credit transfer.
    CreditTransfer,
    /// 48 — Bank card.
    BankCard,
    /// 49 — Direct debit.
    DirectDebit,
    /// 57 — Standing agreement.
    StandingAgreement,
    /// 58 — SEPA credit transfer.
    SepaCreditTransfer,
    /// 59 — SEPA direct debit.
    SepaDirectDebit,
    /// 97 — Clearing between partners.
    ClearingBetweenPartners,
    /// Any other code — flagged by profile validation.
    Other(u16),
}

impl PaymentMeansCode {
    pub fn code(&self) -> u16 {
        match self {
            Self::Cash => 10,
            Self::CreditTransfer => 30,
            Self::BankCard => 48,
            Self::DirectDebit => 49,
            Self::StandingAgreement => 57,
            Self::SepaCreditTransfer => 58,
            Self::SepaDirectDebit => 59,
            Self::ClearingBetweenPartners => 97,
            Self::Other(c) => *c,
        }
    }

    /// Parse from UNTDID 4461 numeric code.
    pub fn from_code(code: u16) -> Self {
        match code {
            10 => Self::Cash,
            30 => Self::CreditTransfer,
            48 => Self::BankCard,
            49 => Self::DirectDebit,
            57 => Self::StandingAgreement,
            58 => Self::SepaCreditTransfer,
            59 => Self::SepaDirectDebit,
            97 => Self::ClearingBetweenPartners,
            c => Self::Other(c),
        }
    }

    /// Whether the code is on the closed allow-list.
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// BG-14: Billing period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    /// BT-73: Start date.
    pub start: NaiveDate,
    /// BT-74: End date.
    pub end: NaiveDate,
}

/// BG-3: Reference to a preceding invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecedingInvoice {
    /// BT-25: Preceding invoice number.
    pub number: String,
    /// BT-26: Preceding invoice issue date.
    pub issue_date: Option<NaiveDate>,
}
