use serde::{Deserialize, Serialize};

/// A billing address in the shape the gateway expects.
///
/// Every field is optional. Fields that were not provided are left out of the
/// serialized form entirely rather than sent as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code_alpha2: Option<String>,
}

impl BillingAddress {
    /// Builds a normalized address from positional form fields.
    ///
    /// An empty string means "not provided". Phone numbers keep only their
    /// digits; region and country codes are uppercased.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        name: &str,
        surname: &str,
        phone: &str,
        street: &str,
        city: &str,
        region: &str,
        postal_code: &str,
        country_iso2: &str,
    ) -> Self {
        Self {
            given_name: present(name).map(str::to_owned),
            surname: present(surname).map(str::to_owned),
            phone_number: present(phone)
                .map(|p| p.chars().filter(char::is_ascii_digit).collect()),
            street_address: present(street).map(str::to_owned),
            locality: present(city).map(str::to_owned),
            region: present(region).map(str::to_uppercase),
            postal_code: present(postal_code).map(str::to_owned),
            country_code_alpha2: present(country_iso2).map(str::to_uppercase),
        }
    }

    /// The reduced address sent along with the card at tokenization time.
    pub fn street_only(street: &str) -> Self {
        Self::build("", "", "", street, "", "", "", "")
    }
}

fn present(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}
