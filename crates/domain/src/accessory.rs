//! Accessory — the addressable cooling device controlled by heatguard.

use serde::{Deserialize, Serialize};

use crate::error::{HeatGuardError, ValidationError};
use crate::id::AccessoryId;

/// A home accessory as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessory {
    pub id: AccessoryId,
    pub name: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

impl Accessory {
    /// Create a builder for constructing an [`Accessory`].
    #[must_use]
    pub fn builder() -> AccessoryBuilder {
        AccessoryBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HeatGuardError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), HeatGuardError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Accessory`].
#[derive(Debug, Default)]
pub struct AccessoryBuilder {
    id: Option<AccessoryId>,
    name: Option<String>,
    manufacturer: Option<String>,
    model: Option<String>,
}

impl AccessoryBuilder {
    #[must_use]
    pub fn id(mut self, id: AccessoryId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Consume the builder, validate, and return an [`Accessory`].
    ///
    /// # Errors
    ///
    /// Returns [`HeatGuardError::Validation`] if `name` is missing or blank.
    pub fn build(self) -> Result<Accessory, HeatGuardError> {
        let accessory = Accessory {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            manufacturer: self.manufacturer,
            model: self.model,
        };
        accessory.validate()?;
        Ok(accessory)
    }
}
