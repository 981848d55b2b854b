use serde::{Deserialize, Serialize};

use kontor_core::{DomainError, DomainResult, RecordId};

use crate::selection::SelectionCriteria;

/// Part identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(pub RecordId);

impl PartId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PartId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// How a product is sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcurementMode {
    InhouseProduction,
    ExternalProcurement,
    Other,
}

/// One component row of a product's production list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListRow {
    /// Search word of the component part.
    pub component_swd: String,
    pub quantity: i64,
}

/// Product master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: PartId,
    swd: String,
    idno: String,
    description: String,
    procurement: ProcurementMode,
    /// Sales price in smallest currency unit (e.g. cents).
    sales_price: Option<u64>,
    product_list: Vec<ProductListRow>,
}

impl Product {
    pub fn new(
        id: PartId,
        swd: impl Into<String>,
        idno: impl Into<String>,
        description: impl Into<String>,
        procurement: ProcurementMode,
    ) -> DomainResult<Self> {
        let swd = swd.into();
        if swd.is_empty() {
            return Err(DomainError::validation("product search word must not be empty"));
        }
        Ok(Self {
            id,
            swd,
            idno: idno.into(),
            description: description.into(),
            procurement,
            sales_price: None,
            product_list: Vec::new(),
        })
    }

    pub fn with_sales_price(mut self, cents: u64) -> Self {
        self.sales_price = Some(cents);
        self
    }

    pub fn with_product_list(mut self, rows: Vec<ProductListRow>) -> Self {
        self.product_list = rows;
        self
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn swd(&self) -> &str {
        &self.swd
    }

    pub fn idno(&self) -> &str {
        &self.idno
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn procurement(&self) -> ProcurementMode {
        self.procurement
    }

    pub fn sales_price(&self) -> Option<u64> {
        self.sales_price
    }

    pub fn product_list(&self) -> &[ProductListRow] {
        &self.product_list
    }
}

/// Supplementary item (freight, packaging, surcharges and the like).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementaryItem {
    id: PartId,
    swd: String,
    description: String,
}

impl SupplementaryItem {
    pub fn new(id: PartId, swd: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            swd: swd.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn swd(&self) -> &str {
        &self.swd
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A part record of any other kind (services, text positions, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherPart {
    id: PartId,
    swd: String,
    description: String,
}

impl OtherPart {
    pub fn new(id: PartId, swd: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            swd: swd.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn swd(&self) -> &str {
        &self.swd
    }
}

/// A part as referenced by sales-document rows.
///
/// Row policies dispatch on the variant instead of downcasting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Part {
    Product(Product),
    SupplementaryItem(SupplementaryItem),
    Other(OtherPart),
}

impl Part {
    pub fn id(&self) -> PartId {
        match self {
            Part::Product(p) => p.id(),
            Part::SupplementaryItem(s) => s.id(),
            Part::Other(o) => o.id(),
        }
    }

    pub fn swd(&self) -> &str {
        match self {
            Part::Product(p) => p.swd(),
            Part::SupplementaryItem(s) => s.swd(),
            Part::Other(o) => o.swd(),
        }
    }

    pub fn as_product(&self) -> Option<&Product> {
        match self {
            Part::Product(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_supplementary(&self) -> bool {
        matches!(self, Part::SupplementaryItem(_))
    }
}

/// Draft of a product to be created (the store assigns id and idno).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub swd: String,
    pub description: String,
    pub procurement: ProcurementMode,
    pub sales_price: Option<u64>,
    pub product_list: Vec<ProductListRow>,
}

impl NewProduct {
    pub fn named(swd: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            swd: swd.into(),
            description: description.into(),
            procurement: ProcurementMode::InhouseProduction,
            sales_price: None,
            product_list: Vec::new(),
        }
    }
}

/// Store contract for part master data.
///
/// The host database owns the real thing; `kontor-infra` ships an in-memory
/// implementation for tests, benches, and the demo runner.
pub trait PartStore {
    /// Resolve a row's part reference.
    fn part(&self, id: PartId) -> DomainResult<Option<Part>>;

    /// Find a product by search word.
    fn find_product_by_swd(&self, swd: &str) -> DomainResult<Option<Product>>;

    /// Create a product from a draft. Fails with a conflict if the search
    /// word is already taken.
    fn create_product(&self, draft: NewProduct) -> DomainResult<Product>;

    /// All products matching `criteria`, in idno order.
    fn select_products(&self, criteria: &SelectionCriteria) -> DomainResult<Vec<Product>>;
}
