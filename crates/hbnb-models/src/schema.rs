use std::fmt;

use hbnb_types::ClassName;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::entity::Model;

/// Declared attribute set of one entity variant.
///
/// Implementors are plain structs with `#[serde(default)]`, so absent fields
/// take their defaults on reconstruction. `FIELDS` lists the serialized
/// field names; anything else found in a record is an extra attribute.
pub trait Schema:
    Serialize + DeserializeOwned + Default + Clone + fmt::Debug + PartialEq + Send + Sync + 'static
{
    const CLASS: ClassName;
    const FIELDS: &'static [&'static str];
}

/// No attributes beyond identity and timestamps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseModelFields {}

impl Schema for BaseModelFields {
    const CLASS: ClassName = ClassName::BaseModel;
    const FIELDS: &'static [&'static str] = &[];
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFields {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Schema for UserFields {
    const CLASS: ClassName = ClassName::User;
    const FIELDS: &'static [&'static str] = &["email", "password", "first_name", "last_name"];
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateFields {
    pub name: String,
}

impl Schema for StateFields {
    const CLASS: ClassName = ClassName::State;
    const FIELDS: &'static [&'static str] = &["name"];
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityFields {
    /// Id of the owning [`State`]. Not validated.
    pub state_id: String,
    pub name: String,
}

impl Schema for CityFields {
    const CLASS: ClassName = ClassName::City;
    const FIELDS: &'static [&'static str] = &["state_id", "name"];
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmenityFields {
    pub name: String,
}

impl Schema for AmenityFields {
    const CLASS: ClassName = ClassName::Amenity;
    const FIELDS: &'static [&'static str] = &["name"];
}

/// A lodging listing. `city_id`, `user_id` and `amenity_ids` reference other
/// entities by id; dangling references are legal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceFields {
    pub city_id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub number_rooms: i64,
    pub number_bathrooms: i64,
    pub max_guest: i64,
    pub price_by_night: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub amenity_ids: Vec<String>,
}

impl Schema for PlaceFields {
    const CLASS: ClassName = ClassName::Place;
    const FIELDS: &'static [&'static str] = &[
        "city_id",
        "user_id",
        "name",
        "description",
        "number_rooms",
        "number_bathrooms",
        "max_guest",
        "price_by_night",
        "latitude",
        "longitude",
        "amenity_ids",
    ];
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewFields {
    pub place_id: String,
    pub user_id: String,
    pub text: String,
}

impl Schema for ReviewFields {
    const CLASS: ClassName = ClassName::Review;
    const FIELDS: &'static [&'static str] = &["place_id", "user_id", "text"];
}

pub type BaseModel = Model<BaseModelFields>;
pub type User = Model<UserFields>;
pub type State = Model<StateFields>;
pub type City = Model<CityFields>;
pub type Amenity = Model<AmenityFields>;
pub type Place = Model<PlaceFields>;
pub type Review = Model<ReviewFields>;
