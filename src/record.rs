//! The normalized record built from one export row.

use serde::{Deserialize, Serialize};

use crate::decode::{Estimates, Tenure, AGE_RANGE, HOME_VALUE, HOUSEHOLD_INCOME, TENURE, WEALTH};
use crate::entity::Entity;
use crate::error::RecordError;
use crate::extraction::{split_row, HeaderIndex};
use crate::geo::GeoPoint;
use crate::identity;

/// Normalized column names this crate reads.
pub mod columns {
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const FIRST_NAME: &str = "first name";
    pub const LAST_NAME: &str = "last name";
    pub const PHONE: &str = "phone number combined";
    pub const ZIP: &str = "zip code";
    pub const COUNTY: &str = "county";
    pub const METRO_AREA: &str = "metro area";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const AGE_RANGE: &str = "age range";
    pub const GENDER: &str = "adult gender";
    pub const OWN_RENT: &str = "own / rent";
    pub const HOUSEHOLD_INCOME: &str = "estimated household income";
    pub const HOME_VALUE: &str = "estimated home value";
    pub const WEALTH: &str = "wealth finder";
    pub const FIPS: &str = "fips";

    /// Every column above, in export order.
    pub const ALL: &[&str] = &[
        ADDRESS, CITY, STATE, FIRST_NAME, LAST_NAME, PHONE, ZIP, COUNTY, METRO_AREA, LATITUDE,
        LONGITUDE, AGE_RANGE, GENDER, OWN_RENT, HOUSEHOLD_INCOME, HOME_VALUE, WEALTH, FIPS,
    ];

    /// Columns without which no record can be built.
    pub const IDENTITY: &[&str] = &[ADDRESS, CITY, STATE];
}

/// One person/household row from a demographic export.
///
/// The id and the address/city/state it was derived from are fixed at
/// construction and only readable. Everything else is public so a store can
/// update it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    id: String,
    pub location: Option<GeoPoint>,
    address: String,
    city: String,
    state: String,
    #[serde(rename = "fName")]
    pub first_name: Option<String>,
    #[serde(rename = "lName")]
    pub last_name: Option<String>,
    #[serde(rename = "phoneNum")]
    pub phone: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub metro_area: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub age_range: Option<String>,
    pub gender: Option<String>,
    pub own_rent: Option<String>,
    pub household_income: Option<String>,
    pub home_value: Option<String>,
    pub wealth: Option<String>,
    pub fips: Option<String>,
    #[serde(default)]
    pub competitors: Vec<String>,
}

impl Record {
    /// Build a record from an already-resolved header and a split row.
    ///
    /// Address, city and state are trimmed before they are stored and
    /// hashed; every other cell is kept exactly as exported.
    ///
    /// # Errors
    /// * `RowTooShort` - the row ends before a resolved column
    /// * `MissingIdentityField` - the header lacks address, city or state
    /// * `MalformedNumeric` - latitude/longitude present but not numeric
    pub fn from_row<S: AsRef<str>>(header: &HeaderIndex, row: &[S]) -> Result<Self, RecordError> {
        let field = |name: &str| -> Result<Option<String>, RecordError> {
            Ok(header.field(name, row)?.map(str::to_string))
        };
        let trimmed = |name: &str| -> Result<Option<String>, RecordError> {
            Ok(header.field(name, row)?.map(|s| s.trim().to_string()))
        };

        let address = trimmed(columns::ADDRESS)?;
        let city = trimmed(columns::CITY)?;
        let state = trimmed(columns::STATE)?;

        let id = identity::record_id(address.as_deref(), city.as_deref(), state.as_deref())?;

        let lat = field(columns::LATITUDE)?;
        let lon = field(columns::LONGITUDE)?;
        let location = GeoPoint::from_strings(lat.as_deref(), lon.as_deref())?;

        Ok(Self {
            id,
            location,
            // record_id has already rejected absent values
            address: address.unwrap_or_default(),
            city: city.unwrap_or_default(),
            state: state.unwrap_or_default(),
            first_name: field(columns::FIRST_NAME)?,
            last_name: field(columns::LAST_NAME)?,
            phone: field(columns::PHONE)?,
            zip: field(columns::ZIP)?,
            county: field(columns::COUNTY)?,
            metro_area: field(columns::METRO_AREA)?,
            lat,
            lon,
            age_range: field(columns::AGE_RANGE)?,
            gender: field(columns::GENDER)?,
            own_rent: field(columns::OWN_RENT)?,
            household_income: field(columns::HOUSEHOLD_INCOME)?,
            home_value: field(columns::HOME_VALUE)?,
            wealth: field(columns::WEALTH)?,
            fips: field(columns::FIPS)?,
            competitors: Vec::new(),
        })
    }

    /// Build a record straight from a header line and a data line.
    ///
    /// Re-resolves the header on every call; use [`Record::from_row`] with a
    /// shared [`HeaderIndex`] when converting many rows.
    pub fn from_csv_line(header: &str, line: &str) -> Result<Self, RecordError> {
        Self::from_row(&HeaderIndex::parse(header), &split_row(line))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Representative household income, 10,000 to 500,000.
    pub fn household_income_estimate(&self) -> Option<u32> {
        HOUSEHOLD_INCOME.decode(self.household_income.as_deref())
    }

    /// Representative home value, 12,500 to 1,000,000.
    pub fn home_value_estimate(&self) -> Option<u32> {
        HOME_VALUE.decode(self.home_value.as_deref())
    }

    /// Representative wealth, 250 to 15,000,000.
    pub fn wealth_estimate(&self) -> Option<u32> {
        WEALTH.decode(self.wealth.as_deref())
    }

    /// Representative age, 21 to 80.
    pub fn age_estimate(&self) -> Option<u8> {
        AGE_RANGE.decode(self.age_range.as_deref())
    }

    pub fn tenure(&self) -> Option<Tenure> {
        TENURE.decode(self.own_rent.as_deref())
    }

    pub fn estimates(&self) -> Estimates {
        Estimates {
            household_income: self.household_income_estimate(),
            home_value: self.home_value_estimate(),
            wealth: self.wealth_estimate(),
            age: self.age_estimate(),
            tenure: self.tenure().map(Tenure::code),
        }
    }
}

impl Entity for Record {
    const COLLECTION: &'static str = "people";

    fn key(&self) -> &str {
        &self.id
    }
}
