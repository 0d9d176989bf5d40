//! Range decoding for categorical export columns.
//!
//! The export describes income, home value, wealth and age as bucket labels
//! ("$100,000 to $124,999", "65+", ...). Each [`RangeTable`] turns such a
//! label into one representative number, roughly the bucket midpoint from
//! the vendor's data dictionary.
//!
//! Matching is by substring, and the first entry whose trigger appears in the
//! label wins. Triggers overlap on purpose (an age label containing "69" would
//! also match later entries), so entry order is part of each table's meaning.

use serde::{Deserialize, Serialize};

/// Ordered (trigger substring, value) table.
#[derive(Debug)]
pub struct RangeTable<T: 'static> {
    pub name: &'static str,
    pub entries: &'static [(&'static str, T)],
}

impl<T: Copy> RangeTable<T> {
    /// Decode a raw label.
    ///
    /// Returns `None` for an absent or empty label and for a label no entry
    /// matches.
    pub fn decode(&self, raw: Option<&str>) -> Option<T> {
        let raw = raw.filter(|s| !s.is_empty())?;

        self.entries
            .iter()
            .find(|(trigger, _)| raw.contains(trigger))
            .map(|(_, value)| *value)
    }
}

/// Home ownership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tenure {
    Rents,
    Owns,
}

impl Tenure {
    /// 0 for renters, 1 for owners.
    pub fn code(self) -> u8 {
        match self {
            Tenure::Rents => 0,
            Tenure::Owns => 1,
        }
    }
}

/// Estimated household income, 10,000 to 500,000.
pub static HOUSEHOLD_INCOME: RangeTable<u32> = RangeTable {
    name: "household income",
    entries: &[
        ("Under", 10_000),
        ("20,000", 25_000),
        ("30,000", 35_000),
        ("40,000", 45_000),
        ("50,000", 55_000),
        ("60,000", 65_000),
        ("70,000", 75_000),
        ("80,000", 85_000),
        ("90,000", 95_000),
        ("100,000", 112_500),
        ("125,000", 137_500),
        ("150,000", 162_500),
        ("200,000", 225_000),
        ("250,000", 275_000),
        ("300,000", 350_000),
        ("400,000", 450_000),
        ("500,000", 500_000),
    ],
};

/// Estimated home value, 12,500 to 1,000,000.
pub static HOME_VALUE: RangeTable<u32> = RangeTable {
    name: "home value",
    entries: &[
        ("$24,999", 12_500),
        ("$25,000", 37_500),
        ("$50,000", 62_500),
        ("$75,000", 87_500),
        ("$100,000", 112_500),
        ("$125,000", 137_500),
        ("$150,000", 162_500),
        ("$175,000", 187_500),
        ("$200,000", 225_000),
        ("$250,000", 275_000),
        ("$300,000", 325_000),
        ("$350,000", 375_000),
        ("$400,000", 425_000),
        ("$450,000", 475_000),
        ("$500,000", 550_000),
        ("$600,000", 650_000),
        ("$700,000", 750_000),
        ("$800,000", 850_000),
        ("$900,000", 950_000),
        ("$1,000,000", 1_000_000),
    ],
};

/// Wealth finder score, 250 to 15,000,000.
pub static WEALTH: RangeTable<u32> = RangeTable {
    name: "wealth",
    entries: &[
        ("$549", 250),
        ("$550", 2_500),
        ("$5,700", 12_500),
        ("$20,703", 40_000),
        ("$51,303", 60_000),
        ("$71,501", 85_000),
        ("$97,300", 112_500),
        ("$126,800", 150_000),
        ("$173,850", 200_000),
        ("$220,900", 260_000),
        ("$295,000", 330_000),
        ("$369,100", 450_000),
        ("$554,050", 650_000),
        ("$739,000", 950_000),
        ("$1,186,300", 1_900_000),
        ("$2,743,733", 3_000_000),
        ("$3,218,667", 3_500_000),
        ("$3,693,600", 6_100_000),
        ("$8,693,520", 10_500_000),
        ("$13,693,440", 15_000_000),
    ],
};

/// Age bracket, 21 to 80.
pub static AGE_RANGE: RangeTable<u8> = RangeTable {
    name: "age range",
    entries: &[
        ("18", 21),
        ("25", 27),
        ("30", 32),
        ("35", 37),
        ("40", 42),
        ("45", 47),
        ("50", 52),
        ("55", 57),
        ("60", 62),
        ("69", 67),
        ("65+", 70),
        ("70", 72),
        ("75+", 80),
    ],
};

/// Own/rent flag. Triggers are fragments ("Confirmed Owner", "Owns",
/// "Renter") rather than whole labels. "Own" is capitalized so that
/// "Unknown" stays unknown.
pub static TENURE: RangeTable<Tenure> = RangeTable {
    name: "tenure",
    entries: &[
        ("firm", Tenure::Owns),
        ("wns", Tenure::Owns),
        ("Own", Tenure::Owns),
        ("ent", Tenure::Rents),
    ],
};

/// All five decoded values for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimates {
    pub household_income: Option<u32>,
    pub home_value: Option<u32>,
    pub wealth: Option<u32>,
    pub age: Option<u8>,
    pub tenure: Option<u8>,
}
