//! Political geography: countries and municipalities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a country.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CountryId(pub i32);

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Someone who can own and control municipalities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: CountryId,

    /// Country name; not required to be unique.
    pub name: String,

    /// Whether nodes in territory this country controls may be used as
    /// route waypoints.
    pub access: bool,
}

/// Identifier of a municipality.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MunicipalityId(pub i32);

impl fmt::Display for MunicipalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The smallest administrative division of the map.
///
/// Every municipality has exactly one de-jure owner and exactly one
/// de-facto controller; split or partial control is not representable.
/// The two differ under occupation (the recognized owner keeps the claim,
/// the occupier holds control).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Municipality {
    pub id: MunicipalityId,

    /// Name of the municipality; not required to be unique.
    pub name: String,

    /// De-jure (recognized) owner.
    pub owner: CountryId,

    /// De-facto controller; the operative authority for transit access.
    pub controller: CountryId,
}
