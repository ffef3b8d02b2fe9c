use crate::error::AppError;
use crate::service::validation::{require_non_empty, Validate};
use serde::{Deserialize, Serialize};

pub const CUSTOMER_COLLECTION: &str = "customer";

fn default_active() -> bool {
    true
}

/// Customer document as persisted in the `customer` collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub address: String,
    pub meter_number: String,
    /// Value printed in the QR tag on the meter or customer card.
    pub qrcode_value: String,
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Body of `POST /api/customers`.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub address: String,
    pub meter_number: String,
    pub qrcode_value: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Validate for CreateCustomerRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("name", &self.name)
    }
}

impl From<CreateCustomerRequest> for Customer {
    fn from(req: CreateCustomerRequest) -> Self {
        Customer {
            name: req.name,
            address: req.address,
            meter_number: req.meter_number,
            qrcode_value: req.qrcode_value,
            phone: req.phone,
            is_active: req.is_active,
        }
    }
}
