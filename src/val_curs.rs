use anyhow::Result;
use quick_xml::SeError;
use serde::Deserialize;
use serde::Serialize;

use crate::currency::CURRENCIES;
use crate::exchange_rate::{RateSnapshot, format_rate};

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Valute {
    #[serde(rename = "@ID")]
    pub id: String,
    #[serde(rename = "NumCode")]
    pub num_code: String,
    #[serde(rename = "CharCode")]
    pub char_code: String,
    #[serde(rename = "Nominal")]
    pub nominal: u32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ValCurs {
    #[serde(rename = "@Date")]
    pub date: String,
    #[serde(rename = "Valute", default)]
    pub valute: Vec<Valute>,
}

impl ValCurs {
    /// Build the document for `rates`, in currency table order. Currencies
    /// missing from `rates` are skipped.
    pub fn from_rates(date_req: &str, rates: &RateSnapshot) -> Self {
        let valute = CURRENCIES
            .iter()
            .filter_map(|currency| {
                let value = rates.get(currency.char_code)?;
                Some(Valute {
                    id: currency.id.to_string(),
                    num_code: currency.numeric_code.to_string(),
                    char_code: currency.char_code.to_string(),
                    nominal: currency.nominal,
                    name: currency.name.to_string(),
                    value: format_rate(*value),
                })
            })
            .collect();

        ValCurs {
            date: date_req.to_string(),
            valute,
        }
    }
}

pub fn to_xml(date_req: &str, rates: &RateSnapshot) -> Result<String, SeError> {
    let val_curs = ValCurs::from_rates(date_req, rates);
    quick_xml::se::to_string_with_root("ValCurs", &val_curs)
}

pub fn from_xml(text: &str) -> Result<ValCurs> {
    Ok(quick_xml::de::from_str(text)?)
}
