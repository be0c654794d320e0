//! # Business Data Structures
//!
//! The `Business` struct is the root container for everything a user
//! enters across the planning wizard: products, fixed costs, additional
//! variable costs, and client prices. Businesses serialize to `.cwb`
//! (Costwise business) files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Business
//! ├── meta: BusinessMetadata (version, owner, name, timestamps)
//! ├── settings: PricingSettings (margin, capacity, investment, context)
//! ├── products: HashMap<Uuid, Product>
//! ├── fixed_costs: Vec<CostItem>
//! ├── additional_costs: Vec<AdditionalVariableCost>
//! └── client_prices: HashMap<Uuid, f64>
//! ```
//!
//! Derived values (price records, summaries, break-even) are never
//! stored here; the engine recomputes them from this container on
//! demand.
//!
//! ## Example
//!
//! ```rust
//! use costwise_core::business::Business;
//! use costwise_core::products::Product;
//!
//! let mut business = Business::new("Dana Baker", "Corner Lemonade");
//! let id = business.add_product(Product::new_resale("Bottled water", 4.0)).unwrap();
//!
//! business.update_client_price(id, 5.5).unwrap();
//! assert_eq!(business.client_price(id), Some(5.5));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::pricing::DEFAULT_MARGIN_PERCENT;
use crate::costs::{AdditionalVariableCost, CostItem};
use crate::errors::{EngineError, EngineResult};
use crate::market::{BusinessContext, BusinessType, LocationZone};
use crate::products::Product;

/// Current schema version for .cwb files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root business container.
///
/// This is the top-level struct that gets serialized to `.cwb` files.
/// Products are stored in a flat UUID-keyed map for O(1) lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    /// Business metadata (version, owner, name, timestamps)
    pub meta: BusinessMetadata,

    /// Pricing and planning settings
    pub settings: PricingSettings,

    /// All products, keyed by UUID
    pub products: HashMap<Uuid, Product>,

    /// Recurring fixed costs
    pub fixed_costs: Vec<CostItem>,

    /// Variable costs not derived from a recipe
    pub additional_costs: Vec<AdditionalVariableCost>,

    /// Client-set selling prices, keyed by product UUID.
    ///
    /// Products without an entry fall back to the suggested price.
    pub client_prices: HashMap<Uuid, f64>,
}

impl Business {
    /// Create a new empty business.
    ///
    /// # Arguments
    ///
    /// * `owner` - Name of the person planning the business
    /// * `name` - The business name
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Business {
            meta: BusinessMetadata {
                version: SCHEMA_VERSION.to_string(),
                owner: owner.into(),
                name: name.into(),
                created: now,
                modified: now,
            },
            settings: PricingSettings::default(),
            products: HashMap::new(),
            fixed_costs: Vec::new(),
            additional_costs: Vec::new(),
            client_prices: HashMap::new(),
        }
    }

    /// Add a product after validating it.
    ///
    /// Returns the UUID the product carries.
    pub fn add_product(&mut self, product: Product) -> EngineResult<Uuid> {
        product.validate()?;
        let id = product.id;
        self.products.insert(id, product);
        self.touch();
        Ok(id)
    }

    /// Remove a product by UUID, along with its client price.
    ///
    /// Returns the removed product if it existed.
    pub fn remove_product(&mut self, id: &Uuid) -> Option<Product> {
        let product = self.products.remove(id);
        if product.is_some() {
            self.client_prices.remove(id);
            self.touch();
        }
        product
    }

    /// Get a product by UUID.
    pub fn get_product(&self, id: &Uuid) -> Option<&Product> {
        self.products.get(id)
    }

    /// Number of products in the business.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Add a fixed cost after validating it.
    pub fn add_fixed_cost(&mut self, item: CostItem) -> EngineResult<()> {
        item.validate()?;
        self.fixed_costs.push(item);
        self.touch();
        Ok(())
    }

    /// Add an additional variable cost after validating it.
    ///
    /// A product-specific entry must reference a product that exists.
    pub fn add_additional_cost(&mut self, cost: AdditionalVariableCost) -> EngineResult<()> {
        cost.validate()?;
        if let Some(product_id) = cost.product_id {
            if !self.products.contains_key(&product_id) {
                return Err(EngineError::not_found("Product", product_id.to_string()));
            }
        }
        self.additional_costs.push(cost);
        self.touch();
        Ok(())
    }

    /// Set the client's selling price for a product.
    ///
    /// # Errors
    ///
    /// * [`EngineError::NotFound`] - the product does not exist
    /// * [`EngineError::InvalidInput`] - the price is zero or negative
    pub fn update_client_price(&mut self, product_id: Uuid, price: f64) -> EngineResult<()> {
        if !self.products.contains_key(&product_id) {
            return Err(EngineError::not_found("Product", product_id.to_string()));
        }
        if price <= 0.0 {
            return Err(EngineError::invalid_input(
                "price",
                price.to_string(),
                "Client price must be positive",
            ));
        }
        self.client_prices.insert(product_id, price);
        self.touch();
        Ok(())
    }

    /// The client's price for a product, if one has been set.
    pub fn client_price(&self, product_id: Uuid) -> Option<f64> {
        self.client_prices.get(&product_id).copied()
    }

    /// The validation context derived from settings.
    pub fn context(&self) -> BusinessContext {
        BusinessContext {
            business_type: self.settings.business_type,
            zone: self.settings.zone,
            employee_count: self.settings.employee_count,
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Business {
    fn default() -> Self {
        Business::new("", "")
    }
}

/// Business metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the person planning the business
    pub owner: String,

    /// Business name
    pub name: String,

    /// When the business was created
    pub created: DateTime<Utc>,

    /// When the business was last modified
    pub modified: DateTime<Utc>,
}

/// Pricing and planning settings for one business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Flat margin percentage for suggested prices
    pub margin_percent: f64,

    /// Units the business can produce/sell per month
    pub monthly_capacity: f64,

    /// Capital figure ROI is measured against.
    ///
    /// The default is a placeholder; a real plan should set the actual
    /// startup investment here.
    pub reference_investment: f64,

    /// Kind of business, drives the essential-cost table
    pub business_type: BusinessType,

    /// Location zone, drives market-range multipliers
    pub zone: LocationZone,

    /// Headcount for the per-employee personnel check
    pub employee_count: u32,
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            margin_percent: DEFAULT_MARGIN_PERCENT,
            monthly_capacity: 500.0,
            reference_investment: 25_000.0,
            business_type: BusinessType::default(),
            zone: LocationZone::default(),
            employee_count: 1,
        }
    }
}
