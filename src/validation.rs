//! Turns loosely typed request fields into ledger inputs.
//!
//! Default substitution: a missing numeric field, or one sent as a blank
//! string, takes the field's default (`0` everywhere except a crew member's
//! monthly price, which defaults to [`DEFAULT_MONTHLY_PRICE`]). Fractional
//! numbers are truncated toward zero. Anything else that is not a
//! non-negative whole number fitting in a `u64` is rejected.
//!
//! Text fields are trimmed. Blank names are not rejected here: the ledgers
//! treat them as silent no-ops.

use crate::errors::ValidationError;
use crate::gaming::DEFAULT_MONTHLY_PRICE;
use crate::models::{
    DailySaleRequest, NewCustomer, NewCustomerRequest, NewMember, NewMemberRequest, NumberInput,
    SaleEntry,
};

pub fn whole_number(
    field: &'static str,
    input: Option<&NumberInput>,
    default: u64,
) -> Result<u64, ValidationError> {
    let Some(input) = input else {
        return Ok(default);
    };

    match input {
        NumberInput::Int(value) => {
            u64::try_from(*value).map_err(|_| ValidationError::Negative { field })
        }
        NumberInput::Float(value) => from_float(field, *value, &value.to_string()),
        NumberInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(default);
            }
            if let Ok(value) = text.parse::<u64>() {
                return Ok(value);
            }
            if let Ok(value) = text.parse::<i64>() {
                return u64::try_from(value).map_err(|_| ValidationError::Negative { field });
            }
            match text.parse::<f64>() {
                Ok(value) => from_float(field, value, text),
                Err(_) => Err(ValidationError::NotANumber {
                    field,
                    value: text.to_string(),
                }),
            }
        }
    }
}

fn from_float(field: &'static str, value: f64, raw: &str) -> Result<u64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field,
            value: raw.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    // `u64::MAX as f64` rounds up to 2^64, the first value that does not fit.
    if value >= u64::MAX as f64 {
        return Err(ValidationError::TooLarge { field });
    }
    Ok(value.trunc() as u64)
}

pub fn price(input: Option<&NumberInput>) -> Result<u64, ValidationError> {
    whole_number("price", input, 0)
}

pub fn sale_entry(request: &DailySaleRequest) -> Result<SaleEntry, ValidationError> {
    Ok(SaleEntry {
        packets_sold: whole_number("packetsSold", request.packets_sold.as_ref(), 0)?,
        packets_cooked: whole_number("packetsCooked", request.packets_cooked.as_ref(), 0)?,
        raw_kg_bought: whole_number("rawKgBought", request.raw_kg_bought.as_ref(), 0)?,
    })
}

pub fn new_member(request: &NewMemberRequest) -> Result<NewMember, ValidationError> {
    Ok(NewMember {
        customer_name: request.customer_name.trim().to_string(),
        email: request.email.trim().to_string(),
        monthly_price: whole_number(
            "monthlyPrice",
            request.monthly_price.as_ref(),
            DEFAULT_MONTHLY_PRICE,
        )?,
    })
}

pub fn new_customer(request: &NewCustomerRequest) -> Result<NewCustomer, ValidationError> {
    Ok(NewCustomer {
        name: request.name.trim().to_string(),
        phone: request.phone.trim().to_string(),
        debt_packets: whole_number("debtPackets", request.debt_packets.as_ref(), 0)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> NumberInput {
        NumberInput::Text(value.to_string())
    }

    #[test]
    fn missing_and_blank_take_default() {
        assert_eq!(whole_number("n", None, 4), Ok(4));
        assert_eq!(whole_number("n", Some(&text("   ")), 4), Ok(4));
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(whole_number("n", Some(&NumberInput::Int(12)), 0), Ok(12));
        assert_eq!(whole_number("n", Some(&text(" 35 ")), 0), Ok(35));
        assert_eq!(whole_number("n", Some(&NumberInput::Float(2.9)), 0), Ok(2));
        assert_eq!(whole_number("n", Some(&text("7.5")), 0), Ok(7));
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert_eq!(
            whole_number("n", Some(&NumberInput::Int(-1)), 0),
            Err(ValidationError::Negative { field: "n" })
        );
        assert_eq!(
            whole_number("n", Some(&text("-3")), 0),
            Err(ValidationError::Negative { field: "n" })
        );
        assert_eq!(
            whole_number("n", Some(&text("ten")), 0),
            Err(ValidationError::NotANumber {
                field: "n",
                value: "ten".to_string()
            })
        );
        assert!(whole_number("n", Some(&text("NaN")), 0).is_err());
    }

    #[test]
    fn rejects_values_beyond_u64() {
        assert_eq!(
            whole_number("price", Some(&NumberInput::Float(1e30)), 0),
            Err(ValidationError::TooLarge { field: "price" })
        );
        assert_eq!(
            whole_number("price", Some(&text("1e300")), 0),
            Err(ValidationError::TooLarge { field: "price" })
        );
        assert_eq!(
            whole_number("price", Some(&text("99999999999999999999")), 0),
            Err(ValidationError::TooLarge { field: "price" })
        );
        assert_eq!(
            whole_number("price", Some(&text("18446744073709551615")), 0),
            Ok(u64::MAX)
        );
    }

    #[test]
    fn member_price_defaults_to_flat_fee() {
        let request = NewMemberRequest {
            customer_name: " Wanjiru ".to_string(),
            email: "w@example.com".to_string(),
            monthly_price: None,
        };
        let member = new_member(&request).unwrap();
        assert_eq!(member.customer_name, "Wanjiru");
        assert_eq!(member.monthly_price, DEFAULT_MONTHLY_PRICE);
    }

    #[test]
    fn sale_entry_defaults_missing_fields_to_zero() {
        let request = DailySaleRequest {
            packets_sold: Some(NumberInput::Int(5)),
            ..Default::default()
        };
        assert_eq!(
            sale_entry(&request),
            Ok(SaleEntry {
                packets_sold: 5,
                packets_cooked: 0,
                raw_kg_bought: 0,
            })
        );
    }
}
