use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Non-negative amount in cents, exchanged with the client as `"45.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct Price(i64);

impl Price {
    pub fn from_cents(cents: i64) -> Option<Self> {
        (cents >= 0).then_some(Self(cents))
    }

    pub fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || format!("Invalid price: {:?}", s);

        let (units, fraction) = match raw.split_once('.') {
            Some((units, fraction)) => (units, fraction),
            None => (raw, ""),
        };
        if units.is_empty()
            || fraction.len() > 2
            || !units.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = units.parse().map_err(|_| invalid())?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        units
            .checked_mul(100)
            .and_then(|value| value.checked_add(cents))
            .and_then(Price::from_cents)
            .ok_or_else(invalid)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl de::Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative decimal price such as \"45.00\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|units| units.checked_mul(100))
                    .and_then(Price::from_cents)
                    .ok_or_else(|| E::custom("price out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
                v.checked_mul(100)
                    .and_then(Price::from_cents)
                    .ok_or_else(|| E::custom("price must not be negative"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
                format!("{:.2}", v).parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

/// A service a professional offers; its duration sets the slot length.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    #[serde(rename = "hairdresser")]
    pub professional_id: i64,
    pub name: String,
    pub description: String,
    #[sqlx(rename = "price_cents")]
    pub price: Price,
    #[serde(rename = "duration")]
    pub duration_minutes: i32,
}

impl Service {
    pub fn duration(&self) -> u32 {
        u32::try_from(self.duration_minutes).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewService {
    #[validate(range(min = 1, message = "hairdresser must be a valid id"))]
    pub hairdresser: i64,
    #[validate(length(min = 1, max = 200, message = "name must have 1 to 200 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[validate(range(min = 1, max = 720, message = "duration must be between 1 and 720 minutes"))]
    pub duration: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateService {
    #[validate(length(min = 1, max = 200, message = "name must have 1 to 200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    #[validate(range(min = 1, max = 720, message = "duration must be between 1 and 720 minutes"))]
    pub duration: Option<i32>,
}

impl UpdateService {
    pub fn apply(self, current: &Service) -> Service {
        Service {
            id: current.id,
            professional_id: current.professional_id,
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self.description.unwrap_or_else(|| current.description.clone()),
            price: self.price.unwrap_or(current.price),
            duration_minutes: self.duration.unwrap_or(current.duration_minutes),
        }
    }
}
