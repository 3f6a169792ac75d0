use std::fmt;

use serde::Deserialize;

use super::errors::OrderError;
use super::value_objects::PaymentMethod;

// ============================================================================
// Mock payment details
// ============================================================================
//
// Nothing is charged. Card fields only get a presence check before the order
// is marked paid; PhonePe and cash on delivery carry no details.
//
// ============================================================================

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    pub card_name: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    pub fn validate(&self) -> Result<(), OrderError> {
        let fields = [&self.card_number, &self.card_name, &self.expiry, &self.cvv];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(OrderError::Validation(
                "Please fill in all card details".to_string(),
            ));
        }
        Ok(())
    }

    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
        let start = digits.len().saturating_sub(4);
        digits[start..].iter().collect()
    }
}

// Never print the card number or CVV
impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &format_args!("****{}", self.last_four()))
            .field("card_name", &self.card_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum PaymentDetails {
    PhonePe,
    CreditCard(CardDetails),
    DebitCard(CardDetails),
    CashOnDelivery,
}

impl PaymentDetails {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentDetails::PhonePe => PaymentMethod::PhonePe,
            PaymentDetails::CreditCard(_) => PaymentMethod::CreditCard,
            PaymentDetails::DebitCard(_) => PaymentMethod::DebitCard,
            PaymentDetails::CashOnDelivery => PaymentMethod::CashOnDelivery,
        }
    }

    pub fn validate(&self) -> Result<(), OrderError> {
        match self {
            PaymentDetails::CreditCard(card) | PaymentDetails::DebitCard(card) => card.validate(),
            PaymentDetails::PhonePe | PaymentDetails::CashOnDelivery => Ok(()),
        }
    }
}
