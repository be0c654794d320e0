//! # Products
//!
//! A product is either a **recipe** (unit cost derived from its
//! ingredient list) or a **resale** item (unit cost declared directly).
//! The tagged [`ProductKind`] enum makes "both" or "neither" states
//! unrepresentable.
//!
//! ## JSON Example (recipe)
//!
//! ```json
//! {
//!   "id": "5f7c1b1e-83c8-4b1e-9df1-1c2b77f5a001",
//!   "name": "Lemonade",
//!   "kind": {
//!     "type": "recipe",
//!     "ingredients": [
//!       { "name": "Lemons", "unit_of_measure": "kg", "portion": 2.0,
//!         "portions_obtained": 5.0, "unit_price": 10.0 }
//!     ]
//!   }
//! }
//! ```
//!
//! ## JSON Example (resale)
//!
//! ```json
//! {
//!   "id": "5f7c1b1e-83c8-4b1e-9df1-1c2b77f5a002",
//!   "name": "Bottled water",
//!   "kind": { "type": "resale", "resale_cost": 4.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};

/// One ingredient line of a recipe.
///
/// The purchased unit yields `portions_obtained` portions; the recipe
/// consumes `portion` of them. `portions_obtained` left unset (or
/// declared as zero/negative) falls back to 1, so a missing yield never
/// divides by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name (e.g., "Lemons")
    pub name: String,

    /// Unit the ingredient is purchased in (e.g., "kg", "L", "unit")
    pub unit_of_measure: String,

    /// Portions of the purchased unit this recipe consumes
    pub portion: f64,

    /// Portions one purchased unit yields; defaults to 1 when unset
    pub portions_obtained: Option<f64>,

    /// Price of one purchased unit
    pub unit_price: f64,
}

impl Ingredient {
    /// Create an ingredient. Does not validate; call [`Ingredient::validate`].
    pub fn new(
        name: impl Into<String>,
        unit_of_measure: impl Into<String>,
        portion: f64,
        portions_obtained: Option<f64>,
        unit_price: f64,
    ) -> Self {
        Ingredient {
            name: name.into(),
            unit_of_measure: unit_of_measure.into(),
            portion,
            portions_obtained,
            unit_price,
        }
    }

    /// Validate input invariants.
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::missing_field("name"));
        }
        if self.portion <= 0.0 {
            return Err(EngineError::invalid_input(
                "portion",
                self.portion.to_string(),
                "Portion must be positive",
            ));
        }
        if self.unit_price <= 0.0 {
            return Err(EngineError::invalid_input(
                "unit_price",
                self.unit_price.to_string(),
                "Unit price must be positive",
            ));
        }
        Ok(())
    }

    /// Portions one purchased unit yields, guarded to at least 1.
    pub fn effective_portions(&self) -> f64 {
        match self.portions_obtained {
            Some(p) if p > 0.0 => p,
            _ => 1.0,
        }
    }

    /// Cost this ingredient contributes to one unit of product:
    /// `(unit_price / portions_obtained) * portion`.
    pub fn unit_cost(&self) -> f64 {
        (self.unit_price / self.effective_portions()) * self.portion
    }
}

/// What kind of product this is, with the data that kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProductKind {
    /// Produced in-house; unit cost derived from the ingredient list
    Recipe { ingredients: Vec<Ingredient> },
    /// Bought and resold; unit cost declared directly
    Resale { resale_cost: f64 },
}

/// A product sold by the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier, assigned at creation
    pub id: Uuid,

    /// Product name (e.g., "Lemonade", "Ham sandwich")
    pub name: String,

    /// Recipe or resale, with the kind-specific data
    pub kind: ProductKind,
}

impl Product {
    /// Create a recipe product with a fresh id.
    pub fn new_recipe(name: impl Into<String>, ingredients: Vec<Ingredient>) -> Self {
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: ProductKind::Recipe { ingredients },
        }
    }

    /// Create a resale product with a fresh id.
    pub fn new_resale(name: impl Into<String>, resale_cost: f64) -> Self {
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: ProductKind::Resale { resale_cost },
        }
    }

    /// Validate input invariants, including every ingredient.
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::missing_field("name"));
        }
        match &self.kind {
            ProductKind::Recipe { ingredients } => {
                if ingredients.is_empty() {
                    return Err(EngineError::missing_field("ingredients"));
                }
                for ingredient in ingredients {
                    ingredient.validate()?;
                }
            }
            ProductKind::Resale { resale_cost } => {
                if *resale_cost <= 0.0 {
                    return Err(EngineError::invalid_input(
                        "resale_cost",
                        resale_cost.to_string(),
                        "Resale cost must be positive",
                    ));
                }
            }
        }
        Ok(())
    }

    /// The product's own unit cost, before any overhead allocation.
    pub fn unit_cost(&self) -> f64 {
        match &self.kind {
            ProductKind::Recipe { ingredients } => {
                ingredients.iter().map(Ingredient::unit_cost).sum()
            }
            ProductKind::Resale { resale_cost } => *resale_cost,
        }
    }

    /// Product kind as a string, matching the serialized tag
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ProductKind::Recipe { .. } => "recipe",
            ProductKind::Resale { .. } => "resale",
        }
    }
}
