//! Sample `users` collection for trying out a fresh database.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub name: String,
    pub age: String,
    pub contact: String,
    pub address: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
}

pub const COLLECTION: &str = "users";

fn user(name: &str, age: &str, contact: &str, address: (&str, &str, &str, &str)) -> User {
    let (city, state, country, pincode) = address;
    User {
        name: name.into(),
        age: age.into(),
        contact: contact.into(),
        address: Address {
            city: city.into(),
            state: state.into(),
            country: country.into(),
            pincode: pincode.into(),
        },
    }
}

pub fn users() -> Vec<User> {
    vec![
        user("Chakravarthy", "23", "9475757473", ("Hyderabad", "Telangana", "India", "500038")),
        user("Meera", "31", "9123456780", ("Bengaluru", "Karnataka", "India", "560001")),
        user("Jonas", "45", "4915112345678", ("Berlin", "Berlin", "Germany", "10115")),
        user("Aiko", "28", "819012345678", ("Osaka", "Osaka", "Japan", "5300001")),
        user("Lucia", "37", "34612345678", ("Valencia", "Valencia", "Spain", "46001")),
    ]
}
